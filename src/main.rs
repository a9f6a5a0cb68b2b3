use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use docpane::app::{DocsViewer, ViewerConfig};
use docpane::models::ThemeMode;
use docpane::render::{
    DiagramOverlay, MathOverlay, PlainDiagramEngine, PlainMathEngine, RenderPipeline,
};
use docpane::services::{DocsRegistry, FileFetcher, MemoryStorage};
use docpane::session::SessionStore;

struct Args {
    docs_root: PathBuf,
    doc_id: String,
    dark: bool,
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut dark = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--dark" => dark = true,
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    let docs_root = PathBuf::from(positional.next()?);
    let doc_id = positional.next()?;
    Some(Args {
        docs_root,
        doc_id,
        dark,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let _logging = docpane::logging::init();

    let Some(args) = parse_args() else {
        eprintln!("usage: docpane <docs-root> <doc-id> [--dark]");
        return ExitCode::FAILURE;
    };

    // The registry manifest ships next to the documents.
    let manifest_path = args.docs_root.join("docs.json");
    let manifest = match std::fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("docpane: cannot read {}: {}", manifest_path.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let registry = match DocsRegistry::from_manifest(&manifest) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("docpane: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let session = SessionStore::new(MemoryStorage::new());
    if args.dark {
        session.set_theme(ThemeMode::Dark);
    }

    let pipeline = RenderPipeline::new(
        MathOverlay::new(PlainMathEngine),
        DiagramOverlay::new(PlainDiagramEngine::default()),
    );
    let mut viewer = DocsViewer::new(
        ViewerConfig::default(),
        registry,
        FileFetcher::new(&args.docs_root),
        pipeline,
        session,
    );

    viewer.set_input_doc(&args.doc_id).await;
    println!("{}", viewer.viewport().content().to_html());
    ExitCode::SUCCESS
}
