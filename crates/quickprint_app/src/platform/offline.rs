//! One-shot commands that work on the stored history without a session.

use std::io::{self, Write};

use anyhow::{bail, Context};
use chrono::Utc;
use quickprint_core::{parse_callback_url, update, AppState, Msg};
use quickprint_engine::HistoryStore;
use quickprint_logging::qp_info;

use super::config::AppConfig;
use super::render;

pub fn print_history(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let out = io::stdout();
    write_history(&HistoryStore::new(&config.data_dir), json, &mut out.lock())
}

pub fn clear_history(config: &AppConfig) -> anyhow::Result<()> {
    HistoryStore::new(&config.data_dir).clear();
    println!("Print history cleared");
    Ok(())
}

pub fn apply_callback(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let line = record_callback(&HistoryStore::new(&config.data_dir), url)?;
    println!("{line}");
    Ok(())
}

pub fn print_config(config: &AppConfig) -> anyhow::Result<()> {
    let text = config.to_ron().context("failed to serialize configuration")?;
    println!("{text}");
    Ok(())
}

fn write_history(store: &HistoryStore, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let jobs = store.load();
    if json {
        let text = serde_json::to_string_pretty(&jobs).context("failed to serialize history")?;
        writeln!(out, "{text}")?;
        return Ok(());
    }

    let (state, _) = update(AppState::new(), Msg::RestoreHistory(jobs));
    for line in render::history_lines(&state.view().history) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn record_callback(store: &HistoryStore, url: &str) -> anyhow::Result<String> {
    let params = parse_callback_url(url).with_context(|| format!("invalid callback URL '{url}'"))?;
    let Some(txid) = params.txid.clone() else {
        bail!("callback URL has no txid parameter");
    };

    let known = store.load().iter().any(|job| job.txid == txid);
    if !known {
        bail!("no print job {txid} in history");
    }
    store.update_result(&txid, params.to_result(Utc::now()));
    qp_info!("Recorded {} for {} from command line", params.status, txid);
    Ok(format!("Recorded {} for {}", params.status, txid))
}
