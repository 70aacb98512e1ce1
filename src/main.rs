use testbank_editor::config::{get_config, init_config};
use testbank_editor::services::bank_api_service::HttpQuestionBankApi;
use testbank_editor::services::editor_service::EditorService;
use tracing::{info, warn};
use uuid::Uuid;

/// Readiness check for a chapter's question set: loads the answer-type
/// catalog and the document from the bank, then reports every question that
/// would block a save.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let chapter_id: Uuid = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: testbank-editor <chapter-id>"))?
        .parse()?;

    let api = HttpQuestionBankApi::from_config(config);
    let editor = EditorService::load(&api, chapter_id).await?;

    let document = editor.document();
    info!(
        %chapter_id,
        questions = document.questions.len(),
        scored = document.settings.scored,
        attempt_limit = document.settings.attempt_limit,
        "question set loaded"
    );

    let issues = editor.readiness_issues();
    if issues.is_empty() {
        info!("question set is ready to publish");
    } else {
        for issue in &issues {
            warn!("{}", issue);
        }
        warn!(count = issues.len(), "question set is not ready");
        std::process::exit(1);
    }

    Ok(())
}
