//! Response modifiers.

use axum::http::StatusCode;

use super::{ModifyContext, ModifyError, ResponseModifier, UpstreamResponse};
use crate::asp::{Response, Status, VerifyQuery};
use crate::provider::Verification;
use crate::verify::verdict::{self, Verdict};

const VERIFY_PLAYER: &str = "/ASP/VerifyPlayer.aspx";

const CODE_VALID: u32 = 996;
const CODE_INVALID: u32 = 997;
const CODE_SYNTAX: u32 = 999;

/// Translates the opaque verification codes of legacy providers into a
/// standard verification response.
///
/// The legacy endpoint cannot tell a bad auth token from a pid/nick mismatch,
/// so every negative answer maps to `InvalidAuthProfileID`.
pub struct LegacyVerification;

impl LegacyVerification {
    fn applies(ctx: &ModifyContext<'_>, res: &UpstreamResponse) -> bool {
        ctx.capabilities.verification == Verification::LegacyCode
            && ctx.path == VERIFY_PLAYER
            && res.status == StatusCode::OK
    }

    fn translate(claim: &VerifyQuery, body: &str, asof: i64) -> Result<Response, ModifyError> {
        let unknown = || ModifyError::UnknownVerificationCode(body.to_string());

        let decoded = Response::parse(body).map_err(|_| unknown())?;
        if !decoded.sections().is_empty() {
            return Err(unknown());
        }

        match decoded.status() {
            Status::Error(CODE_VALID) => Ok(verdict::verification_response(
                claim.pid,
                &claim.nick,
                claim.pid,
                asof,
                Verdict::Ok,
            )),
            Status::Error(CODE_INVALID) => Ok(verdict::unverified(claim.pid, &claim.nick, asof)),
            Status::Error(CODE_SYNTAX) => Ok(Response::syntax_error(asof)),
            _ => Err(unknown()),
        }
    }
}

impl ResponseModifier for LegacyVerification {
    fn name(&self) -> &'static str {
        "legacy_verification"
    }

    fn modify(&self, ctx: &ModifyContext<'_>, res: &mut UpstreamResponse) -> Result<(), ModifyError> {
        if !Self::applies(ctx, res) {
            return Ok(());
        }

        let Some(claim) = res.raw_query.as_deref().and_then(VerifyQuery::parse) else {
            res.set_protocol_body(&Response::syntax_error(ctx.asof));
            return Ok(());
        };

        let body = String::from_utf8_lossy(&res.body).into_owned();
        let translated = Self::translate(&claim, &body, ctx.asof)?;
        tracing::debug!(
            pid = claim.pid,
            provider = %ctx.provider,
            status = ?translated.status(),
            "Translated legacy verification result"
        );
        res.set_protocol_body(&translated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ProviderOverride;
    use crate::provider::{Provider, ProviderTable};
    use axum::body::Bytes;
    use axum::http::HeaderMap;
    use std::collections::HashMap;

    const ASOF: i64 = 1771369200;
    const QUERY: &str = "auth=abcdefghijklmnopqrstuv__&SoldierNick=walterwhite&pid=1234567890";
    const SYNTAX_ERROR: &str = "E\t107\nH\tasof\terr\nD\t1771369200\tInvalid Syntax!\n$\t38\t$";

    struct Case {
        name: &'static str,
        provider: Provider,
        path: &'static str,
        query: &'static str,
        status: StatusCode,
        body: &'static str,
        want: Result<&'static str, &'static str>,
    }

    impl Default for Case {
        fn default() -> Self {
            Self {
                name: "",
                provider: Provider::BF2Hub,
                path: VERIFY_PLAYER,
                query: QUERY,
                status: StatusCode::OK,
                body: "E\t996\n$\t4\t$",
                want: Ok(""),
            }
        }
    }

    fn legacy_table() -> ProviderTable {
        let mut overrides = HashMap::new();
        overrides.insert(
            Provider::BF2Hub,
            ProviderOverride {
                base_url: None,
                native_verification: Some(true),
            },
        );
        ProviderTable::new(&overrides).unwrap()
    }

    fn run(case: &Case) -> Result<String, ModifyError> {
        let table = legacy_table();
        let ctx = ModifyContext {
            provider: case.provider,
            capabilities: table.get(case.provider),
            path: case.path,
            asof: ASOF,
        };
        let mut res = UpstreamResponse {
            status: case.status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(case.body.as_bytes()),
            raw_query: Some(case.query.to_string()),
        };

        LegacyVerification.modify(&ctx, &mut res)?;
        assert_eq!(res.status, case.status, "{}", case.name);
        Ok(String::from_utf8(res.body.to_vec()).unwrap())
    }

    #[test]
    fn test_legacy_verification_translation() {
        let cases = [
            Case {
                name: "verification passed",
                want: Ok("O\nH\tpid\tnick\tspid\tasof\nD\t1234567890\twalterwhite\t1234567890\t1771369200\nH\tresult\nD\tOk\n$\t69\t$"),
                ..Default::default()
            },
            Case {
                name: "verification failed",
                body: "E\t997\n$\t4\t$",
                want: Ok("O\nH\tpid\tnick\tspid\tasof\nD\t0\tINVALID walterwhite\t1234567890\t1771369200\nH\tresult\nD\tInvalidAuthProfileID\n$\t86\t$"),
                ..Default::default()
            },
            Case {
                name: "invalid syntax",
                body: "E\t999\n$\t4\t$",
                want: Ok(SYNTAX_ERROR),
                ..Default::default()
            },
            Case {
                name: "truncates prefixed nick to 23 characters",
                body: "E\t997\n$\t4\t$",
                query: "auth=abcdefghijklmnopqrstuv__&SoldierNick=somelongnamethisis&pid=1234567890",
                want: Ok("O\nH\tpid\tnick\tspid\tasof\nD\t0\tINVALID somelongnamethi\t1234567890\t1771369200\nH\tresult\nD\tInvalidAuthProfileID\n$\t90\t$"),
                ..Default::default()
            },
            Case {
                name: "nick with unescaped query syntax characters",
                query: "auth=abcdefghijklmnopqrstuv__&SoldierNick=it?s%20me&mario?&pid=1234567890",
                want: Ok("O\nH\tpid\tnick\tspid\tasof\nD\t1234567890\tit?s%20me&mario?\t1234567890\t1771369200\nH\tresult\nD\tOk\n$\t74\t$"),
                ..Default::default()
            },
            Case {
                name: "query not starting with auth",
                query: "SoldierNick=walterwhite&pid=1234567890",
                want: Ok(SYNTAX_ERROR),
                ..Default::default()
            },
            Case {
                name: "query without SoldierNick",
                query: "auth=abcdefghijklmnopqrstuv__&pid=1234567890",
                want: Ok(SYNTAX_ERROR),
                ..Default::default()
            },
            Case {
                name: "query without pid",
                query: "auth=abcdefghijklmnopqrstuv__&SoldierNick=walterwhite",
                want: Ok(SYNTAX_ERROR),
                ..Default::default()
            },
            Case {
                name: "non-numeric pid",
                query: "auth=abcdefghijklmnopqrstuv__&SoldierNick=walterwhite&pid=0xff",
                want: Ok(SYNTAX_ERROR),
                ..Default::default()
            },
            Case {
                name: "standard verification provider passes through",
                provider: Provider::PlayBF2,
                body: "O\n$\t1\t$",
                want: Ok("O\n$\t1\t$"),
                ..Default::default()
            },
            Case {
                name: "other endpoint passes through",
                path: "/ASP/getplayerinfo.aspx",
                body: "O\n$\t1\t$",
                want: Ok("O\n$\t1\t$"),
                ..Default::default()
            },
            Case {
                name: "non-200 status passes through",
                status: StatusCode::NOT_FOUND,
                body: "O\n$\t1\t$",
                want: Ok("O\n$\t1\t$"),
                ..Default::default()
            },
            Case {
                name: "unknown code",
                body: "E\t420\n$\t4\t$",
                want: Err("unknown player verification response code"),
                ..Default::default()
            },
            Case {
                name: "undecodable body",
                body: "<html>bad gateway</html>",
                want: Err("unknown player verification response code"),
                ..Default::default()
            },
        ];

        for case in &cases {
            match (run(case), case.want) {
                (Ok(body), Ok(want)) => assert_eq!(body, want, "{}", case.name),
                (Err(err), Err(want)) => assert!(err.to_string().contains(want), "{}: {}", case.name, err),
                (got, want) => panic!("{}: got {:?}, want {:?}", case.name, got, want),
            }
        }
    }

    #[test]
    fn test_default_bf2hub_is_not_translated() {
        let table = ProviderTable::default();
        let ctx = ModifyContext {
            provider: Provider::BF2Hub,
            capabilities: table.get(Provider::BF2Hub),
            path: VERIFY_PLAYER,
            asof: ASOF,
        };
        let mut res = UpstreamResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"E\t996\n$\t4\t$"),
            raw_query: Some(QUERY.to_string()),
        };
        LegacyVerification.modify(&ctx, &mut res).unwrap();
        assert_eq!(&res.body[..], b"E\t996\n$\t4\t$");
    }
}
