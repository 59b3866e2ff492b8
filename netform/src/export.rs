//! Flat CSV form of a strategy profile.
//!
//! The first line holds the number of players. Each following line is
//! `player,immunized,target,...,-1` with immunization as `0`/`1` and the
//! purchased targets in purchase order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::adversary::Adversary;
use crate::error::{NetformError, Result};
use crate::profile::{Strategy, StrategyProfile};
use crate::utility::Costs;

const END_OF_ROW: &str = "-1";

/// One exported row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileRecord {
    pub player: usize,
    pub immunized: bool,
    pub bought: Vec<usize>,
}

pub fn export_profile(profile: &StrategyProfile) -> Vec<ProfileRecord> {
    profile
        .strategies()
        .iter()
        .enumerate()
        .map(|(player, s)| ProfileRecord {
            player,
            immunized: s.immunized(),
            bought: s.bought().to_vec(),
        })
        .collect()
}

pub fn write_profile<W: Write>(profile: &StrategyProfile, writer: W) -> Result<()> {
    let mut w = BufWriter::new(writer);
    writeln!(w, "{}", profile.num_players())?;

    for record in export_profile(profile) {
        write!(w, "{},{}", record.player, u8::from(record.immunized))?;
        for target in &record.bought {
            write!(w, ",{target}")?;
        }
        writeln!(w, ",{END_OF_ROW}")?;
    }

    w.flush()?;
    Ok(())
}

pub fn save_profile(profile: &StrategyProfile, path: &Path) -> Result<()> {
    write_profile(profile, File::create(path)?)
}

/// Parses the CSV form back into a validated profile.
pub fn read_profile<R: BufRead>(reader: R) -> Result<StrategyProfile> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()));

    let (line_no, header) = lines.next().ok_or(NetformError::Parse {
        line: 1,
        reason: "missing player count".to_string(),
    })?;
    let num_players: usize = parse_field(&header?, line_no)?;

    // The header is untrusted, so it never sizes an allocation.
    let mut strategies = Vec::new();
    let mut last_line = line_no;
    for (line_no, line) in lines {
        last_line = line_no;
        let line = line?;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 || fields[fields.len() - 1] != END_OF_ROW {
            return Err(parse_error(line_no, format!("row must end with {END_OF_ROW}")));
        }

        let player: usize = parse_field(fields[0], line_no)?;
        if player != strategies.len() {
            return Err(parse_error(line_no, format!("expected player {}, found {player}", strategies.len())));
        }
        let immunized = match fields[1] {
            "0" => false,
            "1" => true,
            other => return Err(parse_error(line_no, format!("bad immunization flag '{other}'"))),
        };
        let bought = fields[2..fields.len() - 1]
            .iter()
            .map(|f| parse_field(f, line_no))
            .collect::<Result<Vec<usize>>>()?;

        strategies.push(Strategy::new(bought, immunized));
    }

    if strategies.len() != num_players {
        return Err(parse_error(
            last_line + 1,
            format!("header announces {num_players} players, found {}", strategies.len()),
        ));
    }
    StrategyProfile::from_strategies(strategies)
}

pub fn load_profile(path: &Path) -> Result<StrategyProfile> {
    read_profile(BufReader::new(File::open(path)?))
}

/// `initial_graph_n{n}_m{m}_p{p}.csv`
pub fn initial_file_name(num_nodes: usize, num_edges: usize, probability: f64) -> String {
    format!("initial_graph_n{num_nodes}_m{num_edges}_p{probability}.csv")
}

/// `final_graph_n{n}_m{m}_p{p}_ce{ce}_ci{ci}_{k}attacks.csv`
pub fn final_file_name(
    num_nodes: usize,
    num_edges: usize,
    probability: f64,
    costs: Costs,
    adversary: Adversary,
) -> String {
    format!(
        "final_graph_n{num_nodes}_m{num_edges}_p{probability}_ce{}_ci{}_{}attacks.csv",
        costs.edge,
        costs.immunization,
        adversary.attacks()
    )
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| parse_error(line, format!("cannot parse '{field}'")))
}

fn parse_error(line: usize, reason: String) -> NetformError {
    NetformError::Parse { line, reason }
}
