//! Verdicts and the responses that carry them.

use std::fmt;

use crate::asp::Response;
use crate::player::Pid;

/// PID reported back for claims that could not be verified.
pub const DUMMY_PID: Pid = 0;

/// Name fields are cut after this many characters in the game's protocols.
const MAX_NICK_LEN: usize = 23;

/// Result of a player verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    InvalidAuthProfileID,
    InvalidReportedNick,
    InvalidReportedProfileID,
}

impl Verdict {
    /// Decision matrix for locally verified claims.
    pub fn decide(nick_matches: bool, pid_matches: bool) -> Self {
        match (nick_matches, pid_matches) {
            (true, true) => Verdict::Ok,
            (false, false) => Verdict::InvalidAuthProfileID,
            (false, true) => Verdict::InvalidReportedNick,
            (true, false) => Verdict::InvalidReportedProfileID,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "Ok",
            Verdict::InvalidAuthProfileID => "InvalidAuthProfileID",
            Verdict::InvalidReportedNick => "InvalidReportedNick",
            Verdict::InvalidReportedProfileID => "InvalidReportedProfileID",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mark a nick as unverified, keeping within the 23 character limit.
pub fn add_invalid_prefix(nick: &str) -> String {
    format!("INVALID {}", nick).chars().take(MAX_NICK_LEN).collect()
}

/// Nick comparison, case-insensitive only if the owning provider allows it.
pub fn nicks_match(stored: &str, claimed: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        stored.to_lowercase() == claimed.to_lowercase()
    } else {
        stored == claimed
    }
}

/// Data row layout shared by every verification response.
pub fn verification_response(pid: Pid, nick: &str, spid: Pid, asof: i64, verdict: Verdict) -> Response {
    Response::ok()
        .section(
            ["pid", "nick", "spid", "asof"],
            [pid.to_string(), nick.to_string(), spid.to_string(), asof.to_string()],
        )
        .section(["result"], [verdict.to_string()])
}

/// Compare a claim against a stored record.
///
/// An `Ok` verdict echoes the claimed nick unchanged, since the game server
/// compares old and new names case-sensitively.
pub fn compare(
    stored_pid: Pid,
    stored_nick: &str,
    claimed_pid: Pid,
    claimed_nick: &str,
    case_insensitive: bool,
    asof: i64,
) -> (Verdict, Response) {
    let verdict = Verdict::decide(
        nicks_match(stored_nick, claimed_nick, case_insensitive),
        stored_pid == claimed_pid,
    );
    let nick = if verdict == Verdict::Ok { claimed_nick } else { stored_nick };
    (verdict, verification_response(stored_pid, nick, claimed_pid, asof, verdict))
}

/// Response for claims that cannot be matched to any usable record.
pub fn unverified(claimed_pid: Pid, claimed_nick: &str, asof: i64) -> Response {
    verification_response(
        DUMMY_PID,
        &add_invalid_prefix(claimed_nick),
        claimed_pid,
        asof,
        Verdict::InvalidAuthProfileID,
    )
}
