use std::path::{Path, PathBuf};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, LevelFilter};

use content_indexer::export::export_collection;
use content_indexer::{AdapterError, AdapterResult, ContentAdapter, IndexerConfig, PayloadClient};
use utils_common::models::ContentKind;

// 主函数
fn main() {
    let matches = Command::new("内容快照生成器")
        .version(env!("CARGO_PKG_VERSION"))
        .about("从CMS抓取内容并生成列表快照")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("CONFIG_FILE")
            .help("TOML配置文件路径"))
        .arg(Arg::new("base_url")
            .short('u')
            .long("base-url")
            .value_name("URL")
            .help("CMS站点地址，覆盖配置文件"))
        .arg(Arg::new("collection")
            .short('k')
            .long("collection")
            .value_name("COLLECTION")
            .help("要抓取的集合 (posts, gallery, projects)，可重复指定")
            .action(ArgAction::Append))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("OUTPUT_DIR")
            .help("快照输出目录")
            .required(true))
        .arg(Arg::new("json")
            .long("json")
            .help("同时输出JSON快照")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示详细信息")
            .action(ArgAction::SetTrue))
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match run(&matches) {
        Ok(true) => info!("快照生成成功！"),
        Ok(false) => {
            error!("部分集合抓取失败");
            std::process::exit(1);
        }
        Err(e) => {
            error!("快照生成失败: {}", e);
            std::process::exit(1);
        }
    }
}

// 返回是否所有集合都抓取成功
fn run(matches: &ArgMatches) -> AdapterResult<bool> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => IndexerConfig::load(Path::new(path))?,
        None => IndexerConfig::default(),
    };
    if let Some(base_url) = matches.get_one::<String>("base_url") {
        config.base_url = base_url.clone();
    }
    if let Some(collections) = matches.get_many::<String>("collection") {
        config.collections = collections.cloned().collect();
    }
    config.validate()?;

    let output_dir = PathBuf::from(matches.get_one::<String>("output").map(String::as_str).unwrap_or("."));
    std::fs::create_dir_all(&output_dir)?;

    info!("CMS地址: {}", config.base_url);
    info!("输出目录: {}", output_dir.display());

    let start_time = std::time::Instant::now();
    let collections = config.collections.clone();
    let adapter = ContentAdapter::new(PayloadClient::new(config.clone())?, &config);
    let write_json = matches.get_flag("json");

    let mut all_ok = true;
    for name in &collections {
        let kind = ContentKind::from_collection(name)
            .ok_or_else(|| AdapterError::UnknownCollection(name.clone()))?;
        all_ok &= export_collection(&adapter, kind, &output_dir, write_json)?;
    }

    info!("耗时: {:.2}秒", start_time.elapsed().as_secs_f32());
    Ok(all_ok)
}
