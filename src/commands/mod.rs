//! Operations exposed by the Sleeper assistant

pub mod common;
pub mod history;
pub mod league_data;
pub mod lineup;
pub mod matchup;
pub mod trade;
pub mod trade_targets;
pub mod transactions;
pub mod waivers;

pub use common::{OperationOutput, SleeperService};

use crate::cli::GetCmd;

/// Run one operation. Failures come back as an error payload, never as a
/// panic or an `Err`.
pub async fn run(service: &SleeperService, cmd: GetCmd) -> OperationOutput {
    match cmd {
        GetCmd::Leagues => OperationOutput::from_result(league_data::list_leagues(service).await),
        GetCmd::Matchup { league, week } => {
            OperationOutput::from_result(matchup::matchup_preview(service, league.as_deref(), week).await)
        }
        GetCmd::History { league } => {
            OperationOutput::from_result(history::season_history(service, league.as_deref()).await)
        }
        GetCmd::PlayerPoints { player, week, league } => OperationOutput::from_result(
            league_data::player_points(service, &player, week, league.as_deref()).await,
        ),
        GetCmd::Trade { league, give, receive } => OperationOutput::from_result(
            trade::evaluate_trade(service, league.as_deref(), &give, &receive).await,
        ),
        GetCmd::Lineup { league } => {
            OperationOutput::from_result(lineup::evaluate_lineup(service, league.as_deref()).await)
        }
        GetCmd::Waivers { league, position, limit } => OperationOutput::from_result(
            waivers::rank_waivers(service, league.as_deref(), position, limit).await,
        ),
        GetCmd::TradeTargets { league, position, limit } => OperationOutput::from_result(
            trade_targets::find_trade_targets(service, league.as_deref(), position, limit).await,
        ),
        GetCmd::Transactions { league, week } => OperationOutput::from_result(
            transactions::recent_transactions(service, league.as_deref(), week).await,
        ),
        GetCmd::Drafts { league } => {
            OperationOutput::from_result(league_data::league_drafts(service, league.as_deref()).await)
        }
        GetCmd::Bracket { league } => {
            OperationOutput::from_result(league_data::playoff_bracket(service, league.as_deref()).await)
        }
        GetCmd::Cache => OperationOutput::from_result(Ok(league_data::cache_report(service))),
    }
}
