use clap::Parser;
use society_dump::utils::{logger, validation::Validate};
use society_dump::{list_society, CliConfig, FirestoreClient, ListingOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 與原本的 Node 腳本相同，允許以 .env 提供憑證
    dotenv::dotenv().ok();

    let config = CliConfig::parse();
    let file = config.load_file();

    let (verbose, json_logs) = match &file {
        Ok(Some(file)) => (
            config.verbose || file.verbose(),
            config.json_logs || file.json_logs(),
        ),
        _ => (config.verbose, config.json_logs),
    };
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    let settings = match file.and_then(|file| config.resolve(file.as_ref())) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::debug!(
        "Project: {}, database: {}",
        settings.project_id,
        settings.database
    );

    let client = match FirestoreClient::from_config(&settings) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Could not create Firestore client: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let outcome = list_society(&client, &mut stdout.lock(), &mut stderr.lock()).await?;

    // 取得失敗已經回報過，維持結束碼 0
    match outcome {
        ListingOutcome::Listed { count } => tracing::debug!("Listed {} documents", count),
        ListingOutcome::Failed(e) => tracing::debug!("Listing failed: {:?}", e),
    }

    Ok(())
}
