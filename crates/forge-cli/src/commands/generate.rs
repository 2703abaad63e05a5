use forge_engine::{Config, GenerationRequest, Orchestrator, StreamRelay, TERMINAL_SENTINEL};
use forge_project::{ProjectDocument, StreamingParser};
use std::path::Path;
use tokio::sync::mpsc;

/// Run one generation request end to end.
pub async fn run(
    config: &Config,
    prompt: &str,
    stream: bool,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_config(config)?;

    let mut request = GenerationRequest::new(prompt);
    if stream {
        request = request.streamed();
    }

    let doc = if stream {
        generate_streamed(orchestrator, request).await?
    } else {
        let text = orchestrator.complete(&request).await?;
        forge_project::parse_complete(&text)?
    };

    print_summary(&doc);

    if let Some(dir) = out {
        write_files(dir, &doc)?;
    }

    Ok(())
}

/// Drive the orchestrator's relay into an incremental parser, refining the
/// document after every content frame.
async fn generate_streamed(
    orchestrator: Orchestrator,
    request: GenerationRequest,
) -> anyhow::Result<ProjectDocument> {
    let (tx, mut rx) = mpsc::channel(64);
    let mut relay = StreamRelay::new(tx);

    let producer =
        tokio::spawn(async move { orchestrator.stream(&request, &mut relay).await });

    let mut parser = StreamingParser::new();
    while let Some(line) = rx.recv().await {
        if line == TERMINAL_SENTINEL {
            break;
        }
        let Ok(frame) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        if let Some(model) = frame.get("model").and_then(|v| v.as_str()) {
            eprintln!("streaming from {model}");
        } else if let Some(content) = frame.get("content").and_then(|v| v.as_str()) {
            parser.process_chunk(content);
        } else if let Some(error) = frame.get("error").and_then(|v| v.as_str()) {
            eprintln!("stream error: {error}");
        }
    }

    producer.await??;
    Ok(parser.snapshot())
}

fn print_summary(doc: &ProjectDocument) {
    println!("project: {}", doc.project_name);
    for path in doc.files.keys() {
        println!("  file: {path}");
    }
    for op in &doc.updates {
        println!("  update: {}", op.file);
    }
    for command in &doc.commands {
        println!("  command: {command}");
    }
    if !doc.explanation.is_empty() {
        println!("\n{}", doc.explanation);
    }
    if !doc.is_complete {
        eprintln!("warning: response ended before the project was complete");
    }
}

fn write_files(dir: &Path, doc: &ProjectDocument) -> anyhow::Result<()> {
    for (path, content) in &doc.files {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
    }
    println!("wrote {} files to {}", doc.files.len(), dir.display());
    Ok(())
}
