use std::sync::Arc;

use domain::chat::{ChatTurn, Role};
use domain::random::RandomSource;
use domain::selection::Selection;
use infrastructure::gemini_client::{Content, GeminiClient, GenerationConfig};
use shared::telemetry::Telemetry;
use shared::utils::truncate_chars;

use crate::error::ServiceError;

const CHAT_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.8,
    max_output_tokens: 512,
};

const PRIMING_REPLY: &str = "はい、美肌コンシェルジュとしてお手伝いさせていただきます。";

/// Stateless chat proxy: every call replays the whole conversation to Gemini.
pub struct ChatService {
    random: Arc<dyn RandomSource>,
    gemini: Option<GeminiClient>,
}

impl ChatService {
    pub fn new(random: Arc<dyn RandomSource>, gemini: Option<GeminiClient>) -> Self {
        Self { random, gemini }
    }

    pub async fn reply(
        &self,
        message: &str,
        selection: &Selection,
        history: &[ChatTurn],
    ) -> Result<String, ServiceError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::validation("message is required"));
        }

        let Some(client) = &self.gemini else {
            let replies = canned_replies(selection);
            return Ok(replies[self.random.pick_index(replies.len())].clone());
        };

        let telemetry = Telemetry::new();
        let contents = build_contents(message, selection, history);
        tracing::debug!(
            model = client.model(),
            turns = contents.len(),
            message = %truncate_chars(message, 40),
            "forwarding chat to gemini"
        );
        let text = client.generate(&contents, CHAT_GENERATION).await?;
        tracing::info!(elapsed_ms = telemetry.elapsed_ms() as u64, "chat reply from gemini");
        Ok(text)
    }
}

pub fn system_prompt(selection: &Selection) -> String {
    let age = if selection.age_disclosed() {
        format!("{}歳", selection.age())
    } else {
        "未回答".to_string()
    };
    format!(
        "あなたは「美肌コンシェルジュ」という名前の美容アドバイザーAIです。
以下のユーザー情報を元に、親身になって美容相談に応じてください。

【ユーザー情報】
- 年齢: {}
- 肌の悩み: {}

【応答ルール】
- 丁寧で親しみやすい口調で話してください
- 具体的で実践的なアドバイスを心がけてください
- 医療に関しては「医師にご相談ください」と付け加えてください
- 回答は200文字程度で簡潔にまとめてください",
        age,
        selection.names("、")
    )
}

/// System turn, priming reply, prior history, then the new message.
pub fn build_contents(message: &str, selection: &Selection, history: &[ChatTurn]) -> Vec<Content> {
    let mut contents = Vec::with_capacity(history.len() + 3);
    contents.push(Content::user(system_prompt(selection)));
    contents.push(Content::model(PRIMING_REPLY));
    contents.extend(history.iter().map(|turn| match turn.role {
        Role::User => Content::user(turn.content.as_str()),
        Role::Assistant => Content::model(turn.content.as_str()),
    }));
    contents.push(Content::user(message));
    contents
}

fn canned_replies(selection: &Selection) -> [String; 3] {
    let names = selection.names("、");
    let first = if selection.age_disclosed() {
        format!(
            "{}についてのご質問ですね。毎日のスキンケアで大切なのは、まず自分の肌質を知ることです。{}歳の方には、年齢に合った保湿ケアをおすすめします。",
            names,
            selection.age()
        )
    } else {
        format!(
            "{}についてのご質問ですね。毎日のスキンケアで大切なのは、まず自分の肌質を知ることです。年齢に合った保湿ケアを心がけましょう。",
            names
        )
    };
    [
        first,
        "ご質問ありがとうございます。美肌のためには、外側からのケアだけでなく、内側からのケアも大切です。バランスの良い食事と十分な睡眠を心がけましょう。".to_string(),
        "素敵なご質問ですね。スキンケア製品を選ぶ際は、自分の肌悩みに合った成分が配合されているかチェックしてみてください。".to_string(),
    ]
}
