use clap::Parser;
use gallery_modal::utils::error::ErrorSeverity;
use gallery_modal::utils::{logger, validation::Validate};
use gallery_modal::{
    CliConfig, CommandOutcome, ElementIds, HttpCommentService, MemorySurface, ModalController,
    ModalError, ModalSettings,
};

fn exit_code(error: &ModalError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(error: &ModalError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(error).max(1));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(if cli.verbose { "debug" } else { "info" });
            fail(&e);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(config.log_level());
    }

    tracing::info!("Starting gallery-modal CLI");
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let service = HttpCommentService::from_config(&config).unwrap_or_else(|e| fail(&e));
    let controller = ModalController::bind(
        service,
        MemorySurface::portfolio(),
        &ElementIds::default(),
        ModalSettings::from_config(&config),
    )
    .unwrap_or_else(|e| fail(&e));

    let failure = match cli.command.execute(&controller).await {
        Ok(CommandOutcome::Posted { index }) => {
            println!("✅ Comment posted on image {}", index);
            None
        }
        Ok(CommandOutcome::Shown { index, count }) => {
            tracing::debug!("Showing {} comments for image {}", count, index);
            None
        }
        Err(error) => Some(error),
    };

    let ids = ElementIds::default();
    let rendered = controller
        .inspect_surface(|surface| {
            let comments = if cli.html {
                surface.render_html(&ids.comments)
            } else {
                surface.render_text(&ids.comments)
            };
            format!(
                "{}\n{}\n{}",
                surface.render_text(&ids.image),
                surface.render_text(&ids.image_index),
                comments
            )
        })
        .await;
    println!("{}", rendered);

    controller.close_modal().await;

    if let Some(error) = failure {
        fail(&error);
    }

    Ok(())
}
