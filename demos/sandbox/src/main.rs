use std::time::Duration;

use stronghold::prelude::*;

// ---------------------------------------------------------------------------
// Host-side flows
// ---------------------------------------------------------------------------

/// What a join attempt resolved to.
#[derive(Debug, PartialEq)]
enum Join {
    Banned(Option<String>),
    /// Same origin, unexpired session: no password prompt.
    Resumed,
    NeedsLogin,
    NeedsRegistration,
}

/// The order a server checks things when a player connects. The ban check
/// comes first: a banned player may still hold a valid session.
async fn on_join(core: &Stronghold, player: PlayerId, origin: &str) -> Join {
    let identity = core.identity();
    if identity.is_restricted(player, RestrictionKind::Ban).await {
        return Join::Banned(identity.ban_reason(player).await);
    }
    let Some(auth) = core.auth() else {
        return Join::Resumed;
    };
    if !auth.is_registered(player).await {
        Join::NeedsRegistration
    } else if auth.has_valid_session(player, origin).await {
        Join::Resumed
    } else {
        Join::NeedsLogin
    }
}

/// Password check and session issue. The hash comparison stands in for a
/// real password hasher.
async fn login(
    core: &Stronghold,
    player: PlayerId,
    origin: &str,
    hash: &str,
) -> Result<bool, StrongholdError> {
    let auth = core.auth().ok_or(StrongholdError::FeatureDisabled("auth"))?;
    if auth.check_credential(player).await.as_deref() != Some(hash) {
        return Ok(false);
    }
    auth.record_login(player, origin).await?;
    core.issue_session(player, origin).await?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

const CONFIG: &str = r#"{
    "storage": { "path": null },
    "starting_balance": 100.0,
    "default_home_quota": 2,
    "session_ttl_secs": 600
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    stronghold::init_tracing();

    let core = Stronghold::builder()
        .config(CoreConfig::from_json(CONFIG)?)
        .open()
        .await?;

    let steve = PlayerId::random();
    let alex = PlayerId::random();
    let origin = "203.0.113.7";

    tracing::info!(join = ?on_join(&core, steve, origin).await, "steve connects");
    core.identity().register(steve, "Steve", "h(steve)", origin).await?;
    core.identity().register(alex, "Alex", "h(alex)", "198.51.100.2").await?;
    tracing::info!(join = ?on_join(&core, steve, origin).await, "steve registered");
    login(&core, steve, origin, "h(steve)").await?;
    tracing::info!(join = ?on_join(&core, steve, origin).await, "steve reconnects");

    // Economy
    core.ledger().add_balance(steve, 40.0).await?;
    let fine = core.ledger().debit(alex, 250.0).await?;
    tracing::info!(
        steve = core.ledger().get_balance(steve).await,
        alex = fine.balance,
        partial = fine.clamped,
        "balances"
    );

    // Homes and spawn
    let base = Location::new("overworld", Position::new(120.5, 64.0, -33.5), Orientation::new(90.0, 0.0));
    core.set_home(steve, "base", &base).await?;
    core.set_home(steve, "mine", &base).await?;
    if let Err(e) = core.set_home(steve, "farm", &base).await {
        tracing::info!(error = %e, "third home refused");
    }
    core.location().set_spawn(&Location::new("overworld", Position::new(0.5, 70.0, 0.5), Orientation::default())).await?;
    tracing::info!(homes = core.location().count_homes(steve).await, "homes saved");

    // Friends
    if let Some(social) = core.social() {
        social.add_relationship(steve, alex).await?;
        tracing::info!(mutual = social.has_relationship(alex, steve).await, "friend request sent");
        social.add_mutual(alex, steve).await?;
        tracing::info!(mutual = social.has_relationship(alex, steve).await, "friend request accepted");
    }

    // A short mute that expires without anyone lifting it.
    core.identity()
        .restrict(alex, RestrictionKind::Mute, Some("caps lock"), Expiry::after(Duration::from_millis(200)))
        .await?;
    tracing::info!(muted = core.identity().is_restricted(alex, RestrictionKind::Mute).await, "alex muted");
    tokio::time::sleep(Duration::from_millis(250)).await;
    tracing::info!(muted = core.identity().is_restricted(alex, RestrictionKind::Mute).await, "mute elapsed");

    // Audit
    if let Some(audit) = core.audit() {
        let chest = BlockPos::new(121, 64, -34);
        audit.append(steve, AuditAction::Place, "overworld", chest, "chest").await?;
        audit.append(alex, AuditAction::Interact, "overworld", chest, "chest").await?;
        let history = audit.query_near("overworld", chest).await;
        println!("{}", serde_json::to_string_pretty(&history)?);
    }

    core.close().await;
    Ok(())
}
