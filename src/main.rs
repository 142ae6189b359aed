use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{info, warn};

use assignhub::config::AppConfig;
use assignhub::storage;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting pre-startup processing...
        Project: {}
        Version: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    // 初始化存储并确保默认管理员存在
    let storage = storage::create_storage()
        .await
        .expect("Failed to initialize storage");

    if storage::seed_default_admin(storage.as_ref())
        .await
        .expect("Failed to seed admin user")
    {
        warn!("已创建默认管理员 admin/admin，请尽快修改密码");
    } else {
        info!("已存在 admin 角色用户，跳过初始化");
    }

    info!(
        "存储就绪，数据目录: {}，等待外部请求层接入",
        config.storage.data_dir
    );
    Ok(())
}
