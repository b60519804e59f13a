use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gradpress::analysis::{report, VoteAnalysis};
use gradpress::archive::extract_thread_id;
use gradpress::{
    ArchiveClient, ArticleConfig, ArticleGenerator, ArticleWorkflow, Config, LLMProvider,
    OpenAICompatProvider, OutputStore, Storage, VoteAnalysisPipeline,
};

#[derive(Parser, Debug)]
#[command(name = "gradpress")]
#[command(version = "0.1.0")]
#[command(about = "Tally an incubator graduation vote and draft the announcement article")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract votes from a mailing-list thread and save statistics
    Analyze {
        /// Archive URL of the vote thread (.../thread/<id>)
        #[arg(short, long, required_unless_present = "use_summary")]
        thread: Option<String>,

        /// Read counts from the human-written vote summary instead of the archive
        #[arg(long)]
        use_summary: bool,

        /// Reuse a cached analysis of the thread if available
        #[arg(long)]
        cached: bool,
    },

    /// Generate the graduation article from saved vote data
    Article,

    /// Analyze then generate the article
    RunAll {
        /// Archive URL of the vote thread (.../thread/<id>)
        #[arg(short, long, required_unless_present = "use_summary")]
        thread: Option<String>,

        /// Read counts from the human-written vote summary instead of the archive
        #[arg(long)]
        use_summary: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gradpress=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    if let Err(e) = run(args.command).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let store = OutputStore::new(&config.output_dir);

    match command {
        Command::Analyze {
            thread,
            use_summary,
            cached,
        } => analyze(&config, &store, thread.as_deref(), use_summary, cached).await,
        Command::Article => article(&config, &store).await,
        Command::RunAll {
            thread,
            use_summary,
        } => {
            analyze(&config, &store, thread.as_deref(), use_summary, false).await?;
            article(&config, &store).await
        }
    }
}

async fn analyze(
    config: &Config,
    store: &OutputStore,
    thread: Option<&str>,
    use_summary: bool,
    cached: bool,
) -> anyhow::Result<()> {
    if use_summary {
        let summary = store.read_text(&config.vote_summary_path)?;
        let counts = report::save_summary(store, &summary)?;
        println!(
            "Vote summary: {} votes ({} binding +1, {} non-binding +1, {} +0, {} -1)",
            counts.resolved_total(),
            counts.binding_plus_one,
            counts.non_binding_plus_one,
            counts.plus_zero,
            counts.minus_one
        );
        return Ok(());
    }

    let thread_url =
        thread.ok_or_else(|| anyhow::anyhow!("--thread is required unless --use-summary is set"))?;

    // Initialize storage
    let mut storage = Storage::new(store.resolve(&config.database_path))?;

    // Check for cached analysis if requested
    if cached {
        let thread_id = extract_thread_id(thread_url)?;
        if let Some(hit) = storage.get_analysis(&thread_id)? {
            tracing::info!("Using cached analysis from {}", hit.analyzed_at);
            report::save_analysis(store, &hit.analysis)?;
            print_analysis(&hit.analysis);
            return Ok(());
        }
        tracing::info!("No cached analysis found, fetching thread");
    }

    // Initialize clients
    let archive = ArchiveClient::new(&config.archive_base_url, config.http_timeout_secs)?;
    let llm = match &config.llm {
        Some(llm_config) => {
            Some(Arc::new(OpenAICompatProvider::new(llm_config)?) as Arc<dyn LLMProvider>)
        }
        None => {
            tracing::info!("No LLM configured, using pattern matching only");
            None
        }
    };

    let pipeline = VoteAnalysisPipeline::new(archive, llm);

    // Run analysis
    tracing::info!("Analyzing vote thread: {}", thread_url);
    let analysis = pipeline.analyze_thread(thread_url).await?;

    storage.save_analysis(thread_url, &analysis)?;
    report::save_analysis(store, &analysis)?;
    print_analysis(&analysis);

    Ok(())
}

async fn article(config: &Config, store: &OutputStore) -> anyhow::Result<()> {
    let llm: Arc<dyn LLMProvider> = Arc::new(OpenAICompatProvider::new(config.require_llm()?)?);
    tracing::info!("Generating article with the {} provider", llm.name());
    let article_config = ArticleConfig::from(config);

    let generator = ArticleGenerator::new(
        llm,
        store.clone(),
        article_config.clone(),
        config.quote_blocklist.clone(),
    );
    let workflow = ArticleWorkflow::new(generator, store.clone(), article_config);

    let saved = workflow.run().await?;
    println!("Article \"{}\" written to {}", saved.title, saved.article_path.display());
    println!("Outline written to {}", saved.outline_path.display());

    Ok(())
}

fn print_analysis(analysis: &VoteAnalysis) {
    println!("\n=== Vote thread {} ===\n", analysis.thread_id);
    println!("Votes counted: {}", analysis.stats.total);
    for (key, count) in &analysis.stats.by_binding_value {
        println!("  {}: {}", key, count);
    }
    if analysis.failed > 0 {
        println!("Emails without a vote: {}", analysis.failed);
    }
}
