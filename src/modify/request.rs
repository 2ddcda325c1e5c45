//! Request modifiers.

use axum::http::header::HOST;
use axum::http::HeaderValue;

use super::{ModifyContext, ModifyError, RequestModifier};

const GETRANKSTATUS: &str = "/ASP/getrankstatus.aspx";
const SENDSNAPSHOT: &str = "/ASP/sendsnapshot.aspx";
const GETPLAYERINFO: &str = "/ASP/getplayerinfo.aspx";

/// Full BFHQ `info` selection for `getplayerinfo.aspx`.
pub const BFHQ_INFO_KEYS: [&str; 63] = [
    "per*", "cmb*", "twsc", "cpcp", "cacp", "dfcp", "kila", "heal", "rviv", "rsup", "rpar", "tgte", "dkas", "dsab",
    "cdsc", "rank", "cmsc", "kick", "kill", "deth", "suic", "ospm", "klpm", "klpr", "dtpr", "bksk", "wdsk", "bbrs",
    "tcdr", "ban", "dtpm", "lbtl", "osaa", "vrk", "tsql", "tsqm", "tlwf", "mvks", "vmks", "mvn*", "vmr*", "fkit",
    "fmap", "fveh", "fwea", "wtm-", "wkl-", "wdt-", "wac-", "wkd-", "vtm-", "vkl-", "vdt-", "vkd-", "vkr-", "atm-",
    "awn-", "alo-", "abr-", "ktm-", "kkl-", "kdt-", "kkd-",
];

/// Sets the GameSpy host name a provider's edge routes on.
pub struct HostRewrite;

impl HostRewrite {
    pub fn host_for(path: &str) -> &'static str {
        match path {
            GETRANKSTATUS => "battlefield2.gamestats.gamespy.com",
            SENDSNAPSHOT => "gamestats.gamespy.com",
            _ => "BF2Web.gamespy.com",
        }
    }
}

impl RequestModifier for HostRewrite {
    fn name(&self) -> &'static str {
        "host_rewrite"
    }

    fn modify(&self, ctx: &ModifyContext<'_>, req: &mut reqwest::Request) -> Result<(), ModifyError> {
        if !ctx.capabilities.requires_alt_host {
            return Ok(());
        }

        let host = Self::host_for(ctx.path);
        req.headers_mut().insert(HOST, HeaderValue::from_static(host));
        Ok(())
    }
}

/// Replaces the `info` parameter of player info requests with the BFHQ list.
pub struct InfoQuery;

impl RequestModifier for InfoQuery {
    fn name(&self) -> &'static str {
        "info_query"
    }

    fn modify(&self, ctx: &ModifyContext<'_>, req: &mut reqwest::Request) -> Result<(), ModifyError> {
        if !ctx.capabilities.requires_extra_query || ctx.path != GETPLAYERINFO {
            return Ok(());
        }

        let kept: Vec<(String, String)> = req
            .url()
            .query_pairs()
            .filter(|(key, _)| key != "info")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let url = req.url_mut();
        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &kept {
                query.append_pair(key, value);
            }
            query.append_pair("info", &BFHQ_INFO_KEYS.join(","));
        }
        Ok(())
    }
}
