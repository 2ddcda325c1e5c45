//! Literal parser for the `VerifyPlayer.aspx` query.
//!
//! Game servers send `auth=<a>&SoldierNick=<nick>&pid=<pid>` without
//! percent-encoding, so the nick may contain `&`, `=` or `?`. Generic query
//! parsing would split the nick; instead the query is cut on the first
//! occurrence of each separator in their fixed order.

use crate::player::Pid;

const AUTH: &str = "auth=";
const NICK: &str = "&SoldierNick=";
const PID: &str = "&pid=";

/// Parameters of a player verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyQuery {
    pub auth: String,
    pub nick: String,
    pub pid: Pid,
}

impl VerifyQuery {
    /// Parse a raw (not unescaped) query string. `None` means syntax error.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(AUTH)?;
        let (auth, rest) = rest.split_once(NICK)?;
        let (nick, pid) = rest.split_once(PID)?;

        if nick.is_empty() || pid.is_empty() || !pid.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            auth: auth.to_string(),
            nick: nick.to_string(),
            pid: pid.parse().ok()?,
        })
    }
}
