//! `script` (§4.E, deps: `captions`): parse the author-supplied script
//! text. The DAG edge to `captions` is a sequencing gate (a script only
//! makes sense once the final caption track exists) — the parser itself
//! only reads `ExecContext::script_source`.

use clipcut_captions::parse_script;
use clipcut_core::{Result, StepName};

use crate::context::ExecContext;
use crate::progress::{self, Sender};
use crate::steps::now_iso;

pub async fn exec(ctx: &ExecContext<'_>, tx: &Sender) -> Result<serde_json::Value> {
    progress::progress(tx, StepName::Script, 50, "parsing script").await?;
    let lines = match ctx.script_source {
        Some(source) => parse_script(source),
        None => Vec::new(),
    };
    progress::progress(tx, StepName::Script, 100, "done").await?;

    let line_count = lines.len();
    Ok(serde_json::json!({
        "scriptLines": lines,
        "lineCount": line_count,
        "createdAt": now_iso(),
    }))
}
