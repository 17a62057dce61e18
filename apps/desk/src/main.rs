use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, AnalysisExchange, CmarkRenderer, DragPhase, Element, ExchangeError,
    HttpAnalysisClient, Page, PageConfig, SubmissionState, SubmitOutcome, SurfaceEvent,
};
use shared::{domain::SelectedFile, protocol::ActionRequest};
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleSurface;

#[derive(Parser, Debug)]
#[command(name = "resume-desk", about = "Analyze a PDF resume against a job description")]
struct Cli {
    /// TOML file with endpoint, messages, actions and FAQ entries.
    #[arg(long, global = true, default_value = "desk.toml")]
    config: PathBuf,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit the resume and print the rendered result.
    Analyze(AnalyzeArgs),
    /// Print the FAQ after toggling the given questions in order.
    Faq {
        #[arg(long = "open")]
        open: Vec<usize>,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    resume: PathBuf,
    #[arg(long, conflicts_with = "job_description_file")]
    job_description: Option<String>,
    #[arg(long)]
    job_description_file: Option<PathBuf>,
    /// Action tag or button label; defaults to the first configured action.
    #[arg(long)]
    action: Option<String>,
    /// Hand the file over as a drag-and-drop gesture instead of a picker choice.
    #[arg(long)]
    via_drop: bool,
    /// Write the rendered markup here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut config = load_settings(Some(cli.config.as_path()))?;
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }
    let config = Arc::new(config);

    match cli.command {
        Command::Analyze(args) => analyze(config, args).await,
        Command::Faq { open } => faq(config, &open),
    }
}

/// Exchange for commands that never submit; the FAQ works without a reachable
/// or even valid server url.
struct OfflineExchange;

#[async_trait]
impl AnalysisExchange for OfflineExchange {
    async fn analyze(&self, request: &ActionRequest) -> Result<String, ExchangeError> {
        tracing::warn!(submission = %request.id, "analysis requested without a backend");
        Err(ExchangeError::Transport("no analysis backend configured".into()))
    }
}

async fn analyze(config: Arc<PageConfig>, args: AnalyzeArgs) -> Result<ExitCode> {
    let job_description = match (&args.job_description, &args.job_description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read job description '{}'", path.display()))?,
        (None, None) => String::new(),
    };
    let action_index = resolve_action(&config, args.action.as_deref())?;
    let resume = read_resume(&args.resume).await?;

    let surface = Arc::new(ConsoleSurface::new(&config, args.quiet));
    surface.set_input(Element::JobDescription, job_description);
    let exchange = Arc::new(HttpAnalysisClient::from_config(&config)?);
    let renderer = Arc::new(CmarkRenderer::new(config.render));
    let mut page = Page::new(config.clone(), surface.clone(), exchange, renderer);

    if args.via_drop {
        page.handle(SurfaceEvent::Drag(DragPhase::Enter));
        page.handle(SurfaceEvent::Drag(DragPhase::Drop(vec![resume])));
    } else {
        page.handle(SurfaceEvent::FileChosen(vec![resume]));
    }

    let Some(submission) = page.handle(SurfaceEvent::ActionActivated(action_index)).submission
    else {
        bail!("action {action_index} did not start a submission");
    };
    let outcome = submission.await.context("submission task failed")?;

    let code = match outcome {
        SubmitOutcome::Completed(SubmissionState::Success(_)) => ExitCode::SUCCESS,
        SubmitOutcome::Completed(_) => ExitCode::from(1),
        SubmitOutcome::Rejected(_) => return Ok(ExitCode::from(2)),
        SubmitOutcome::Busy => bail!("another submission is still loading"),
    };

    let markup = surface.markup(Element::ResultContent).unwrap_or_default();
    match &args.output {
        Some(path) => tokio::fs::write(path, markup)
            .await
            .with_context(|| format!("failed to write result '{}'", path.display()))?,
        None => println!("{markup}"),
    }
    Ok(code)
}

fn faq(config: Arc<PageConfig>, open: &[usize]) -> Result<ExitCode> {
    let surface = Arc::new(ConsoleSurface::new(&config, true));
    let renderer = Arc::new(CmarkRenderer::new(config.render));
    let mut page = Page::new(config.clone(), surface, Arc::new(OfflineExchange), renderer);

    for &index in open {
        page.handle(SurfaceEvent::QuestionActivated(index));
    }

    if config.faq.is_empty() {
        println!("No FAQ entries configured.");
    }
    for (entry, item) in config.faq.iter().zip(page.disclosure().items()) {
        if item.expanded {
            println!("[-] {}", entry.question);
            for line in entry.answer.lines() {
                println!("    {line}");
            }
        } else {
            println!("[+] {}", entry.question);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve_action(config: &PageConfig, requested: Option<&str>) -> Result<usize> {
    let Some(requested) = requested else {
        if config.actions.is_empty() {
            bail!("no actions configured");
        }
        return Ok(0);
    };
    config
        .actions
        .iter()
        .position(|button| button.tag.as_str() == requested || button.label == requested)
        .with_context(|| {
            let known: Vec<&str> = config.actions.iter().map(|b| b.tag.as_str()).collect();
            format!("unknown action '{requested}'; expected one of {known:?}")
        })
}

async fn read_resume(path: &Path) -> Result<SelectedFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read resume '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(SelectedFile::new(name, media_type, bytes))
}

#[cfg(test)]
mod tests {
    use shared::domain::ActionButton;

    use super::*;

    #[test]
    fn action_resolves_by_tag_or_label() {
        let mut config = PageConfig::default();
        config.actions.push(ActionButton::new("Missing keywords", "Keywords"));

        assert_eq!(resolve_action(&config, None).expect("default"), 0);
        assert_eq!(resolve_action(&config, Some("Keywords")).expect("tag"), 1);
        assert_eq!(
            resolve_action(&config, Some("Missing keywords")).expect("label"),
            1
        );
        let err = resolve_action(&config, Some("Cover letter")).expect_err("unknown");
        assert!(err.to_string().contains("unknown action 'Cover letter'"));
    }

    #[test]
    fn cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "resume-desk",
            "--server-url",
            "http://localhost:9000",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job-description",
            "Rust engineer",
            "--via-drop",
        ])
        .expect("parse");

        assert_eq!(cli.server_url.as_deref(), Some("http://localhost:9000"));
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.resume, PathBuf::from("cv.pdf"));
        assert_eq!(args.job_description.as_deref(), Some("Rust engineer"));
        assert!(args.via_drop);
    }

    #[test]
    fn faq_does_not_need_a_valid_server_url() {
        let mut config = PageConfig::default();
        config.server_url = "not a url".into();
        config.faq = vec![shared::domain::FaqEntry::new("Stored?", "No.")];

        faq(Arc::new(config), &[0]).expect("faq");
    }

    #[tokio::test]
    async fn offline_exchange_reports_transport_failure() {
        let request = ActionRequest::new(
            "job",
            SelectedFile::new("cv.pdf", "application/pdf", b"%PDF".to_vec()),
            shared::domain::ActionTag::new("Analyze Resume"),
        );
        assert!(matches!(
            OfflineExchange.analyze(&request).await,
            Err(ExchangeError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn resume_media_type_is_guessed_from_extension() {
        let dir = std::env::temp_dir().join(format!("resume_desk_read_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.expect("dir");
        let pdf = dir.join("cv.pdf");
        let png = dir.join("cv.png");
        tokio::fs::write(&pdf, b"%PDF-1.7").await.expect("write pdf");
        tokio::fs::write(&png, b"png").await.expect("write png");

        let read_pdf = read_resume(&pdf).await.expect("read pdf");
        let read_png = read_resume(&png).await.expect("read png");
        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");

        assert_eq!(read_pdf.name, "cv.pdf");
        assert_eq!(read_pdf.media_type, "application/pdf");
        assert!(read_pdf.is_pdf());
        assert_eq!(read_png.media_type, "image/png");
        assert!(!read_png.is_pdf());
    }
}
