#[macro_use]
extern crate log;

use answer_summarizer::annotator::AnnotationClient;
use answer_summarizer::model::AgentAnswer;
use answer_summarizer::{summarize, Config};
use clap::Parser;
use dotenvy::dotenv;
use humantime::format_duration;
use std::error::Error;
use std::time::Instant;
use std::{fs, path};

#[derive(Parser, PartialEq, Debug)]
#[clap(author, version, about, long_about = None)]
struct Options {
    /// JSON file holding the agent answers: [{"agent": ..., "message": ...}]
    #[clap(short, long, required = true)]
    input: path::PathBuf,

    #[clap(short, long, required = true)]
    qid: String,

    #[clap(short, long)]
    max_hops: Option<usize>,

    /// Write the summary here instead of stdout
    #[clap(short, long)]
    output: Option<path::PathBuf>,

    /// Base URL of the node annotation service; when set, summary nodes are
    /// annotated before the summary is written
    #[clap(short, long)]
    annotator_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    dotenv().ok();
    env_logger::init();

    let options = Options::parse();
    debug!("{:?}", options);

    let config = Config::from_env()?;
    let max_hops = options.max_hops.unwrap_or(config.max_hops);

    let contents = fs::read_to_string(options.input.as_path())?;
    let answers: Vec<AgentAnswer> = serde_json::from_str(contents.as_str())?;
    info!("summarizing {} agent answers", answers.len());

    let mut summary = summarize(options.qid.as_str(), &answers, max_hops)?;
    info!(
        "summary holds {} results, {} paths, {} nodes, {} edges",
        summary.results.len(),
        summary.paths.len(),
        summary.nodes.len(),
        summary.edges.len()
    );

    if let Some(annotator_url) = &options.annotator_url {
        let client = AnnotationClient::new(annotator_url);
        let curies: Vec<String> = summary.nodes.keys().cloned().collect();
        let annotations = client.annotate(&curies).await?;
        info!("annotated {} of {} nodes", annotations.len(), curies.len());
        for (curie, annotation) in annotations {
            if let Some(node) = summary.nodes.get_mut(&curie) {
                node.insert("annotation".to_string(), annotation);
            }
        }
    }

    let rendered = serde_json::to_string_pretty(&summary)?;
    match &options.output {
        Some(output) => fs::write(output.as_path(), rendered)?,
        None => println!("{}", rendered),
    }

    info!("Duration: {}", format_duration(start.elapsed()).to_string());
    Ok(())
}
