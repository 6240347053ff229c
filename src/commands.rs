use std::path::PathBuf;
use std::time::{Duration, Instant};

use wakmeter_core::{BackgroundTasks, CombatLogEngine, EngineConfig, EngineConfigExt, Reader};

use crate::printer::StdoutPrinter;

fn engine(config: &EngineConfig) -> CombatLogEngine {
    let engine = CombatLogEngine::from_config(config);
    engine.add_handler(StdoutPrinter);
    engine
}

fn reader(path: &str, config: &EngineConfig) -> Reader {
    Reader::from(PathBuf::from(path))
        .with_poll_interval(Duration::from_millis(config.reader.poll_interval_ms))
}

pub fn replay(path: &str, config: &EngineConfig) -> Result<(), String> {
    let timer = Instant::now();
    let engine = engine(config);

    engine
        .replay(&reader(path, config))
        .map_err(|e| e.to_string())?;
    engine.flush();

    tracing::info!(
        path,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Replay finished"
    );
    Ok(())
}

pub async fn tail(
    path: Option<String>,
    from_start: bool,
    config: &EngineConfig,
) -> Result<(), String> {
    let path = path
        .or_else(|| config.reader.log_path.clone())
        .ok_or("no log file given: use --path or set reader.log_path in the config")?;

    let engine = engine(config);
    let reader = reader(&path, config);

    let start_pos = if from_start || config.reader.from_start {
        engine.replay(&reader).map_err(|e| e.to_string())?
    } else {
        std::fs::metadata(&path).map_err(|e| e.to_string())?.len()
    };
    tracing::info!(path, start_pos, "Following log file");

    let mut tasks = BackgroundTasks::default();
    let tail_engine = engine.clone();
    tasks.log_tail = Some(tokio::spawn(async move {
        if let Err(err) = tail_engine.tail(&reader, start_pos).await {
            tracing::error!(error = %err, "Log tail stopped");
        }
    }));

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map_err(|e| e.to_string())?,
        _ = tasks.join_log_tail() => {}
    }

    tasks.abort_all();
    engine.flush();
    Ok(())
}

pub fn show_config(config: &EngineConfig) -> Result<(), String> {
    let path = EngineConfig::config_path().map_err(|e| e.to_string())?;
    println!("config file: {}", path.display());
    println!("{config:#?}");
    Ok(())
}
