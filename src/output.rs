//! Output formatting and persistence for ranking tables.
//!
//! Supports pretty-printing, CSV and JSON writers, and optional gzip
//! compression of any output file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

use crate::analyzers::prior::BetaPrior;
use crate::analyzers::types::{RankedPlayer, RankingTable};
use crate::stats::PlayerId;

/// Logs the ranking table using Rust's debug pretty-print format.
pub fn print_pretty(table: &RankingTable) {
    debug!("{:#?}", table);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One row of the ranking table as the dashboard labels it.
#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Player Name")]
    player_name: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "EB % of Blocks Successful")]
    smoothed_rate: f64,
    #[serde(rename = "% of Blocks Successful")]
    raw_rate: f64,
    #[serde(rename = "Count Plays")]
    total_plays: u32,
    #[serde(rename = "Count Successful Blocks")]
    successful_blocks: u32,
    #[serde(rename = "Count Plays Beaten By Defender")]
    beaten_by_defender: u32,
    #[serde(rename = "Count QB Hits Allowed")]
    hits_allowed: u32,
    #[serde(rename = "Count QB Hurrys Allowed")]
    hurries_allowed: u32,
    #[serde(rename = "Count QB Sacks Allowed")]
    sacks_allowed: u32,
    #[serde(rename = "College Name")]
    college_name: &'a str,
    #[serde(rename = "Height")]
    height: &'a str,
    #[serde(rename = "Weight")]
    weight: &'a str,
    #[serde(rename = "Birth Date")]
    birth_date: &'a str,
}

impl<'a> RankingRow<'a> {
    fn new(rank: usize, p: &'a RankedPlayer) -> Self {
        Self {
            rank,
            player_name: &p.info.display_name,
            position: &p.info.official_position,
            smoothed_rate: p.smoothed_rate,
            raw_rate: p.raw_rate,
            total_plays: p.stats.total_plays,
            successful_blocks: p.stats.successful_blocks,
            beaten_by_defender: p.stats.beaten_by_defender,
            hits_allowed: p.stats.hits_allowed,
            hurries_allowed: p.stats.hurries_allowed,
            sacks_allowed: p.stats.sacks_allowed,
            college_name: &p.info.college_name,
            height: &p.info.height,
            weight: &p.info.weight,
            birth_date: &p.info.birth_date,
        }
    }
}

/// JSON document describing one ranking run.
#[derive(Debug, Serialize)]
pub struct RankingReport<'a> {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub prior: BetaPrior,
    pub prior_mean: f64,
    pub min_plays: u32,
    pub qualifying_players: usize,
    pub dropped_player_ids: &'a [PlayerId],
    pub players: Vec<&'a RankedPlayer>,
}

impl<'a> RankingReport<'a> {
    /// `players` is the (possibly filtered) subset of `table` to include.
    pub fn new(table: &'a RankingTable, players: Vec<&'a RankedPlayer>) -> Self {
        Self {
            schema_version: 1,
            generated_at: Utc::now(),
            prior: table.prior,
            prior_mean: table.prior.mean(),
            min_plays: table.min_plays,
            qualifying_players: table.qualifying_players,
            dropped_player_ids: &table.dropped_player_ids,
            players,
        }
    }
}

/// Writes ranked players as CSV with 1-based ranks in the given order.
pub fn write_ranking_csv<W: Write>(writer: W, players: &[&RankedPlayer]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for (i, p) in players.iter().enumerate() {
        writer.serialize(RankingRow::new(i + 1, p))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Destination for an output table: stdout or a file, optionally gzipped.
pub enum Sink {
    Plain(Box<dyn Write>),
    Gzip(GzEncoder<Box<dyn Write>>),
}

impl Sink {
    /// Opens `path` for writing; `-` means stdout.
    pub fn open(path: &str, gzip: bool) -> Result<Self> {
        let inner: Box<dyn Write> = if path == "-" {
            Box::new(std::io::stdout().lock())
        } else {
            let file = File::create(path).with_context(|| format!("creating {path}"))?;
            Box::new(BufWriter::new(file))
        };
        debug!(path, gzip, "Opened output");

        Ok(if gzip {
            Sink::Gzip(GzEncoder::new(inner, Compression::default()))
        } else {
            Sink::Plain(inner)
        })
    }

    /// Flushes everything and writes the gzip trailer if compressing.
    pub fn finish(self) -> Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush()?,
            Sink::Gzip(encoder) => encoder.finish()?.flush()?,
        }
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

/// Opens `path`, runs `write` against it and finishes the sink.
pub fn write_to<F>(path: &str, gzip: bool, write: F) -> Result<()>
where
    F: FnOnce(&mut Sink) -> Result<()>,
{
    let mut sink = Sink::open(path, gzip)?;
    write(&mut sink)?;
    sink.finish()?;
    info!(path, gzip, "Output written");
    Ok(())
}
