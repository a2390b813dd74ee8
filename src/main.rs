use std::process;

use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

use handoff::{
    application::{
        demo::demo_state,
        error::AppError,
        export::{ExportCoordinator, ExportFormat},
        import,
        progress::section_progress,
    },
    config,
    domain::{
        actions::{Action, apply},
        state::InterviewState,
    },
    infra::{storage::SnapshotStore, telemetry},
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let command = cli_args.command.unwrap_or(config::Command::Status);
    match command {
        config::Command::Export(args) => run_export(settings, args).await,
        config::Command::Import(args) => run_import(settings, args).await,
        config::Command::Status => run_status(settings).await,
        config::Command::Demo => run_demo(settings).await,
        config::Command::Reset => run_reset(settings).await,
    }
}

async fn load_session(store: &SnapshotStore) -> InterviewState {
    store.load().await.unwrap_or_else(InterviewState::initial)
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let store = SnapshotStore::new(settings.storage.directory.clone());
    let state = if args.demo {
        demo_state()
    } else {
        load_session(&store).await
    };

    let coordinator = ExportCoordinator::new(settings.product.name.clone());

    if args.stdout {
        let artifact = coordinator
            .compile(&state, handoff::application::export::ArtifactKind::Text)
            .await;
        let text = String::from_utf8(artifact.bytes)
            .map_err(|err| AppError::unexpected(format!("text artifact was not UTF-8: {err}")))?;
        print!("{text}");
        return Ok(());
    }

    let format = match args.format {
        config::FormatArg::Text => ExportFormat::Text,
        config::FormatArg::Pdf => ExportFormat::Pdf,
        config::FormatArg::Both => ExportFormat::Both,
    };
    let written = coordinator
        .export_to_dir(&state, format, &settings.export.directory)
        .await?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

async fn run_import(settings: config::Settings, args: config::ImportArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|error| AppError::from(handoff::infra::error::InfraError::Io(error)))?;

    let snapshot = import::parse_snapshot(&raw)?;
    let state = apply(
        &InterviewState::initial(),
        Action::LoadSnapshot {
            state: Box::new(snapshot),
        },
    );
    let state = apply(
        &state,
        Action::MarkPersisted {
            at: time::OffsetDateTime::now_utc(),
        },
    );

    let store = SnapshotStore::new(settings.storage.directory);
    store.save(&state).await;
    info!(target: "handoff::import", file = %args.file.display(), "import complete");
    println!("Imported {}", args.file.display());
    Ok(())
}

async fn run_status(settings: config::Settings) -> Result<(), AppError> {
    let store = SnapshotStore::new(settings.storage.directory);
    let state = load_session(&store).await;

    let progress = section_progress(&state);
    let completed = progress.iter().filter(|section| section.complete).count();
    println!("{} of {} sections have data", completed, progress.len());
    for section in &progress {
        let marker = if section.complete { "done" } else { "    " };
        println!("  {}. {:<28} {marker}", section.letter, section.title);
    }
    if let Some(at) = state.last_persisted_at {
        println!("Last saved: {at}");
    }
    Ok(())
}

async fn run_demo(settings: config::Settings) -> Result<(), AppError> {
    let state = apply(
        &InterviewState::initial(),
        Action::LoadSnapshot {
            state: Box::new(demo_state()),
        },
    );
    let store = SnapshotStore::new(settings.storage.directory);
    store.save(&state).await;
    println!("Demo interview loaded");
    Ok(())
}

async fn run_reset(settings: config::Settings) -> Result<(), AppError> {
    let store = SnapshotStore::new(settings.storage.directory);
    store.clear().await;
    println!("Saved session cleared");
    Ok(())
}
