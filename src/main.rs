//! speechdesk - Azure 语音合成桌面工具
//!
//! 命令行外壳：组装端口实现，把子命令分发给命令/查询处理器。

mod cli;

use clap::Parser;
use std::future::Future;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use speechdesk::application::commands::handlers::{
    DownloadHandler, PlayHandler, RefreshCatalogHandler, SelectLocaleHandler, StopHandler,
    UpdateSettingsHandler,
};
use speechdesk::application::commands::{
    DownloadCommand, DownloadResponse, PlayCommand, RefreshCatalogCommand, SelectLocaleCommand,
    StopCommand, UpdateSettingsCommand,
};
use speechdesk::application::ports::{SpeechClientFactoryPort, VoiceCatalogPort};
use speechdesk::application::queries::handlers::{
    GetSettingsHandler, ListLocalesHandler, ListVoicesHandler,
};
use speechdesk::application::queries::{GetSettings, ListLocales, ListVoices};
use speechdesk::application::ApplicationError;
use speechdesk::config::{load_config_from_path, print_config, AppConfig};
use speechdesk::domain::voice::LocaleFilter;
use speechdesk::infrastructure::adapters::{
    AzureSpeechClient, AzureSpeechClientConfig, FakeSpeechClient,
};
use speechdesk::infrastructure::events::EventPublisher;
use speechdesk::infrastructure::memory::{InMemorySessionManager, InMemoryVoiceCatalog};
use speechdesk::infrastructure::persistence::JsonSettingsStore;

use cli::{Cli, Commands, SettingsAction};

/// 组装好的处理器依赖
struct App {
    config: AppConfig,
    speech_client: Arc<dyn SpeechClientFactoryPort>,
    session_manager: Arc<InMemorySessionManager>,
    catalog: Arc<InMemoryVoiceCatalog>,
    store: Arc<JsonSettingsStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    let events = EventPublisher::new().arc();
    spawn_event_logger(&events);

    let speech_client: Arc<dyn SpeechClientFactoryPort> = if cli.offline {
        Arc::new(FakeSpeechClient::with_defaults())
    } else {
        build_azure_client(&config)?
    };

    let app = App {
        speech_client,
        session_manager: InMemorySessionManager::new(events.clone()).arc(),
        catalog: InMemoryVoiceCatalog::new(events).arc(),
        store: Arc::new(JsonSettingsStore::new(&config.settings.path)),
        config,
    };

    // 操作失败只提示用户，不重试
    match run(&app, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},speechdesk={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// 状态变更回调：订阅事件并写入日志
fn spawn_event_logger(events: &EventPublisher) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        use tokio::sync::broadcast::error::RecvError;
        loop {
            match rx.recv().await {
                Ok(event) => tracing::debug!(?event, "State changed"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Event logger lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn build_azure_client(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechClientFactoryPort>> {
    let client = AzureSpeechClient::new(AzureSpeechClientConfig::from(&config.speech))?;

    #[cfg(feature = "playback")]
    let client = client.with_playback(Arc::new(
        speechdesk::infrastructure::adapters::RodioPlayback::new(),
    ));

    Ok(Arc::new(client))
}

/// 运行一个合成操作；期间收到 Ctrl-C 时发出 Stop 并等待会话收尾
async fn with_stop<F: Future>(fut: F, stop: &StopHandler) -> F::Output {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            output = &mut fut => return output,
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    stop.handle(StopCommand);
                }
            }
        }
    }
}

async fn refresh_catalog(app: &App) -> Result<(), ApplicationError> {
    let settings = GetSettingsHandler::new(app.store.clone()).handle(GetSettings)?;
    RefreshCatalogHandler::new(app.speech_client.clone(), app.catalog.clone())
        .handle(RefreshCatalogCommand {
            credentials: settings.credentials(),
        })
        .await?;
    Ok(())
}

async fn run(app: &App, command: Commands) -> Result<(), ApplicationError> {
    match command {
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                print_config(&app.config);
                let settings = GetSettingsHandler::new(app.store.clone()).handle(GetSettings)?;
                let key = if settings.speech_key.is_empty() {
                    "<not set>"
                } else {
                    "********"
                };
                println!("speechKey:                          {}", key);
                println!("speechRegion:                       {}", settings.speech_region);
                println!("autoGenerateFileName:               {}", settings.auto_generate_file_name);
                println!(
                    "autoOpenFileFolderAfterDownloading: {}",
                    settings.auto_open_file_folder_after_downloading
                );
                println!("saveTo:                             {}", settings.save_to);
            }
            SettingsAction::Set {
                key,
                region,
                auto_name,
                auto_open,
                save_to,
            } => {
                UpdateSettingsHandler::new(app.store.clone()).handle(UpdateSettingsCommand {
                    speech_key: key,
                    speech_region: region,
                    auto_generate_file_name: auto_name,
                    auto_open_file_folder_after_downloading: auto_open,
                    save_to,
                })?;
                println!("Settings saved to {}", app.store.path().display());
            }
        },
        Commands::Locales => {
            refresh_catalog(app).await?;
            for locale in ListLocalesHandler::new(app.catalog.clone()).handle(ListLocales) {
                println!("{}", locale);
            }
        }
        Commands::Voices { locale } => {
            refresh_catalog(app).await?;
            if let Some(locale) = locale {
                let filter: LocaleFilter = locale.parse().unwrap_or_default();
                SelectLocaleHandler::new(app.catalog.clone())
                    .handle(SelectLocaleCommand { filter })?;
            }
            let selected = app.catalog.selected_voice().map(|v| v.name);
            for voice in ListVoicesHandler::new(app.catalog.clone()).handle(ListVoices::default()) {
                let marker = if selected.as_deref() == Some(voice.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<36} {:<8} {}",
                    marker,
                    voice.name,
                    voice.locale,
                    voice.display_name.as_deref().unwrap_or_default()
                );
            }
        }
        Commands::Play { text, voice } => {
            let settings = GetSettingsHandler::new(app.store.clone()).handle(GetSettings)?;
            let play = PlayHandler::new(app.speech_client.clone(), app.session_manager.clone());
            let stop = StopHandler::new(app.session_manager.clone());

            let response = with_stop(
                play.handle(PlayCommand {
                    credentials: settings.credentials(),
                    text,
                    voice_name: voice,
                }),
                &stop,
            )
            .await?;
            println!("Playback {}", response.outcome.as_str());
        }
        Commands::Download {
            text,
            voice,
            output,
        } => {
            let settings = GetSettingsHandler::new(app.store.clone()).handle(GetSettings)?;
            let download =
                DownloadHandler::new(app.speech_client.clone(), app.session_manager.clone());
            let stop = StopHandler::new(app.session_manager.clone());

            let cmd = DownloadCommand::from_settings(&settings, text, voice, output);
            match with_stop(download.handle(cmd), &stop).await? {
                DownloadResponse::Aborted => {
                    println!("No destination chosen; pass --output or enable auto naming");
                }
                DownloadResponse::Saved {
                    path,
                    outcome,
                    audio_bytes,
                    open_folder,
                    ..
                } => {
                    if outcome.is_completed() {
                        println!("Saved {} ({} bytes)", path.display(), audio_bytes);
                        if open_folder {
                            let folder = path
                                .parent()
                                .filter(|p| !p.as_os_str().is_empty())
                                .unwrap_or_else(|| Path::new("."));
                            println!("Folder: {}", folder.display());
                        }
                    } else {
                        println!("Download {}", outcome.as_str());
                    }
                }
            }
        }
    }
    Ok(())
}
