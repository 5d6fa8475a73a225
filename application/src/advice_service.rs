use std::sync::Arc;

use anyhow::anyhow;
use domain::advice::{AdviceResult, CONCERN_SEPARATOR};
use domain::catalog::AdviceCatalog;
use domain::random::RandomSource;
use domain::selection::Selection;
use infrastructure::gemini_client::{Content, GeminiClient, GenerationConfig};
use infrastructure::json_extract::parse_embedded;
use shared::telemetry::Telemetry;

use crate::error::ServiceError;

const ADVICE_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 2048,
};

/// Produces advice from the canned catalog, or from Gemini when a key is configured.
pub struct AdviceService {
    catalog: Arc<AdviceCatalog>,
    random: Arc<dyn RandomSource>,
    gemini: Option<GeminiClient>,
}

impl AdviceService {
    pub fn new(
        catalog: Arc<AdviceCatalog>,
        random: Arc<dyn RandomSource>,
        gemini: Option<GeminiClient>,
    ) -> Self {
        Self {
            catalog,
            random,
            gemini,
        }
    }

    /// Gemini is only asked when the age is known, since the prompt is built around it.
    pub fn uses_llm_for(&self, selection: &Selection) -> bool {
        self.gemini.is_some() && selection.age_disclosed()
    }

    pub async fn generate(&self, selection: &Selection) -> Result<AdviceResult, ServiceError> {
        if selection.is_empty() {
            return Err(ServiceError::validation("at least one concern is required"));
        }
        match &self.gemini {
            Some(client) if selection.age_disclosed() => self.generate_with_llm(client, selection).await,
            _ => Ok(self.generate_static(selection)),
        }
    }

    /// One random row per concern, joined in catalog order, plus an independent lifestyle tip.
    pub fn generate_static(&self, selection: &Selection) -> AdviceResult {
        let mut analysis = Vec::with_capacity(selection.len());
        let mut treatment = Vec::with_capacity(selection.len());
        let mut depacos = Vec::with_capacity(selection.len());
        let mut drugstore = Vec::with_capacity(selection.len());

        for concern in selection.concerns() {
            let table = self.catalog.advice_for(concern);
            let row = table.variant(self.random.pick_index(table.len()));
            analysis.push(row.analysis);
            treatment.push(row.treatment);
            depacos.push(row.depacos);
            drugstore.push(row.drugstore);
        }

        let pool = self.catalog.lifestyle();
        let lifestyle = pool[self.random.pick_index(pool.len())].clone();

        AdviceResult {
            analysis: format!("{}\n\n{}", age_phrase(selection), analysis.join(CONCERN_SEPARATOR)),
            treatment: treatment.join(CONCERN_SEPARATOR),
            depacos: depacos.join(CONCERN_SEPARATOR),
            drugstore: drugstore.join(CONCERN_SEPARATOR),
            lifestyle,
        }
    }

    async fn generate_with_llm(
        &self,
        client: &GeminiClient,
        selection: &Selection,
    ) -> Result<AdviceResult, ServiceError> {
        let telemetry = Telemetry::new();
        let prompt = advice_prompt(selection);
        tracing::debug!(
            model = client.model(),
            concerns = selection.len(),
            age = selection.age(),
            "requesting advice from gemini"
        );

        let reply = client.generate(&[Content::user(prompt)], ADVICE_GENERATION).await?;
        let result: AdviceResult = parse_embedded(&reply).map_err(|err| {
            tracing::warn!(error = %err, "gemini advice reply could not be parsed");
            err
        })?;
        if !result.is_complete() {
            return Err(anyhow!("gemini advice reply has blank fields").into());
        }
        tracing::info!(elapsed_ms = telemetry.elapsed_ms() as u64, "advice generated by gemini");
        Ok(result)
    }
}

/// Lead line of the analysis panel. Undisclosed age (0) is left out.
fn age_phrase(selection: &Selection) -> String {
    let names = selection.names("・");
    if selection.age_disclosed() {
        format!("{}歳・{}のお悩みについて", selection.age(), names)
    } else {
        format!("{}のお悩みについて", names)
    }
}

pub fn advice_prompt(selection: &Selection) -> String {
    format!(
        r#"あなたは経験豊富な美容アドバイザーです。
以下のユーザーに向けて、肌の悩みに合わせた美容アドバイスを作成してください。

【ユーザー情報】
- 年齢: {age}歳
- 肌の悩み: {names}

【出力形式】
次の5つのキーを持つJSONオブジェクトのみを出力してください。各値は日本語の文章で、200文字程度にまとめてください。
{{
  "analysis": "肌の状態の分析",
  "treatment": "おすすめの美容医療",
  "depacos": "おすすめのデパコス（百貨店で買える化粧品）",
  "drugstore": "おすすめのドラッグストアコスメ",
  "lifestyle": "生活習慣のアドバイス"
}}"#,
        age = selection.age(),
        names = selection.names("、"),
    )
}
