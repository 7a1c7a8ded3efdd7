//! Issues a bearer token for a site backend or an operator.
//!
//! Usage: `issue_token <user_id> <username> [blog_id] [timezone] [resource:action ...]`
use anyhow::{Context, Result, bail};
use login_history::application::{dto::TokenSubject, ports::security::TokenManager};
use login_history::config::AppConfig;
use login_history::domain::login::BlogId;
use login_history::domain::user::{Capability, UserId};
use login_history::infrastructure::security::token::BiscuitTokenManager;
use std::collections::HashSet;

const DEFAULT_RIGHTS: [(&str, &str); 3] = [
    ("tracker", "write"),
    ("login_history", "read"),
    ("login_history", "delete"),
];

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let mut args = std::env::args().skip(1);

    let user_id: i64 = args
        .next()
        .context("missing <user_id>")?
        .parse()
        .context("user_id must be an integer")?;
    let username = args.next().context("missing <username>")?;
    let blog_id = match args.next() {
        Some(raw) => BlogId::new(raw.parse().context("blog_id must be an integer")?)?,
        None => BlogId::MAIN,
    };
    let timezone = args.next().filter(|tz| !tz.is_empty() && tz != "-");

    let mut capabilities: HashSet<Capability> = HashSet::new();
    for raw in args {
        let Some((resource, action)) = raw.split_once(':') else {
            bail!("capability must look like resource:action, got {raw}");
        };
        capabilities.insert(Capability::new(resource, action));
    }
    if capabilities.is_empty() {
        capabilities.extend(DEFAULT_RIGHTS.map(|(r, a)| Capability::new(r, a)));
    }

    let manager = BiscuitTokenManager::new(config.biscuit_private_key(), config.token_ttl())?;
    let token = manager
        .issue(TokenSubject {
            user_id: UserId::new(user_id)?,
            username,
            blog_id,
            timezone,
            capabilities,
        })
        .await?;

    println!("{}", serde_json::to_string_pretty(&token)?);
    Ok(())
}
