use serde::{Serialize, de::DeserializeOwned};
use tauri_wasm::{args, invoke};

/// Tauri binds command parameters by name; every command here takes its
/// payload as `args`.
#[derive(Serialize)]
struct CommandArgs<'a, A> {
    args: &'a A,
}

#[derive(Serialize)]
struct NoArgs {}

#[derive(Serialize)]
struct UiLogArg<'a> {
    event: &'a str,
    detail: &'a str,
}

pub async fn invoke_tauri<R, A>(cmd: &str, args_payload: &A) -> Result<R, String>
where
    R: DeserializeOwned,
    A: Serialize,
{
    invoke_raw(cmd, &CommandArgs { args: args_payload }).await
}

pub async fn invoke_tauri_without_args<R>(cmd: &str) -> Result<R, String>
where
    R: DeserializeOwned,
{
    invoke_raw(cmd, &NoArgs {}).await
}

/// Forwards a UI event to the backend log.
pub async fn ui_log(event: &str, detail: &str) {
    let arg = UiLogArg { event, detail };
    if let Err(err) = invoke_tauri::<(), _>("ui_log", &arg).await {
        tracing::warn!(error = %err, event, "ui_log failed");
    }
}

async fn invoke_raw<R, P>(cmd: &str, payload: &P) -> Result<R, String>
where
    R: DeserializeOwned,
    P: Serialize,
{
    let payload = args(payload).map_err(|e| format!("failed to encode args: {e}"))?;
    let value = invoke(cmd)
        .with_args(payload)
        .await
        .map_err(|e| format!("invoke error: {e:?}"))?;

    serde_wasm_bindgen::from_value(value).map_err(|e| format!("decode error: {e}"))
}
