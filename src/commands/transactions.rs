//! Recent league transactions (current and previous week).

use futures::future::try_join_all;
use serde::Serialize;
use std::collections::HashMap;

use super::common::{team_directory, SleeperService, TeamInfo};
use crate::{
    cli::types::{PlayerId, RosterId, Week},
    core::PlayerDirectory,
    error::Result,
    sleeper::types::Transaction,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMove {
    pub player_id: PlayerId,
    pub name: String,
    pub roster_id: RosterId,
    pub team: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub transaction_id: String,
    pub kind: String,
    pub status: Option<String>,
    pub week: Week,
    pub created: Option<i64>,
    pub adds: Vec<PlayerMove>,
    pub drops: Vec<PlayerMove>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionReport {
    pub league_id: String,
    pub weeks: Vec<Week>,
    pub transactions: Vec<TransactionSummary>,
}

fn moves(
    raw: &HashMap<PlayerId, RosterId>,
    teams: &HashMap<RosterId, TeamInfo>,
    directory: &PlayerDirectory,
) -> Vec<PlayerMove> {
    let mut moves: Vec<PlayerMove> = raw
        .iter()
        .map(|(player, roster)| PlayerMove {
            player_id: player.clone(),
            name: directory.name_of(player),
            roster_id: *roster,
            team: teams.get(roster).and_then(|t| t.team_name.clone()),
        })
        .collect();
    moves.sort_by(|a, b| a.name.cmp(&b.name));
    moves
}

/// Newest first.
pub fn summarize(
    batches: Vec<(Week, Vec<Transaction>)>,
    teams: &HashMap<RosterId, TeamInfo>,
    directory: &PlayerDirectory,
) -> Vec<TransactionSummary> {
    let mut out: Vec<TransactionSummary> = batches
        .into_iter()
        .flat_map(|(week, txs)| txs.into_iter().map(move |tx| (week, tx)))
        .map(|(week, tx)| TransactionSummary {
            adds: moves(&tx.adds, teams, directory),
            drops: moves(&tx.drops, teams, directory),
            transaction_id: tx.transaction_id,
            kind: tx.kind,
            status: tx.status,
            week,
            created: tx.created,
        })
        .collect();
    out.sort_by(|a, b| b.created.cmp(&a.created));
    out
}

pub async fn recent_transactions(
    service: &SleeperService,
    hint: Option<&str>,
    week: Option<Week>,
) -> Result<TransactionReport> {
    let resolution = service.resolve(hint).await?;
    let league_id = &resolution.binding.league_id;
    let client = service.client();

    let week = match week {
        Some(w) => w,
        None => service.current_state().await?.week,
    };
    let weeks: Vec<Week> = std::iter::once(week).chain(week.previous()).collect();

    let fetches = weeks.iter().map(|&w| async move {
        client
            .league_transactions(league_id, w)
            .await
            .map(|txs| (w, txs))
    });
    let (batches, rosters, users) = tokio::try_join!(
        try_join_all(fetches),
        service.cache().rosters(client, league_id),
        client.league_users(league_id),
    )?;
    service.load_players_best_effort().await;

    let teams = team_directory(&rosters, &users);
    Ok(TransactionReport {
        league_id: league_id.to_string(),
        transactions: summarize(batches, &teams, service.players()),
        weeks,
    })
}
