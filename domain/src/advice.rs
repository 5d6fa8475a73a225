use serde::{Deserialize, Serialize};

/// Placed between per-concern texts when several concerns are selected.
pub const CONCERN_SEPARATOR: &str = "\n\n━━━━━━━━━━━━━━━━━\n\n";

/// Advice produced for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub analysis: String,
    pub treatment: String,
    pub depacos: String,
    pub drugstore: String,
    pub lifestyle: String,
}

impl AdviceResult {
    /// Generic advice shown when generation failed, so the wizard still reaches its result step.
    pub fn fallback() -> Self {
        Self {
            analysis: "肌の状態を分析中にエラーが発生しました。再度お試しください。".to_string(),
            treatment: "美容皮膚科では様々な治療オプションがあります。まずはカウンセリングで自分に合った治療を見つけましょう。".to_string(),
            depacos: "SK-IIやPOLA、クレ・ド・ポー ボーテなど、高品質なデパコスがおすすめです。".to_string(),
            drugstore: "肌ラボ、キュレル、ミノンなど、ドラッグストアでも優秀なスキンケア製品が揃っています。".to_string(),
            lifestyle: "十分な睡眠（7-8時間）、バランスの良い食事、適度な運動が大切です。紫外線対策も年間を通じて行いましょう。".to_string(),
        }
    }

    pub fn get(&self, category: AdviceCategory) -> &str {
        match category {
            AdviceCategory::Analysis => &self.analysis,
            AdviceCategory::Treatment => &self.treatment,
            AdviceCategory::Depacos => &self.depacos,
            AdviceCategory::Drugstore => &self.drugstore,
            AdviceCategory::Lifestyle => &self.lifestyle,
        }
    }

    pub fn is_complete(&self) -> bool {
        AdviceCategory::ALL
            .iter()
            .all(|c| !self.get(*c).trim().is_empty())
    }
}

/// The five panels of the result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceCategory {
    Analysis,
    Treatment,
    Depacos,
    Drugstore,
    Lifestyle,
}

impl AdviceCategory {
    pub const ALL: [AdviceCategory; 5] = [
        AdviceCategory::Analysis,
        AdviceCategory::Treatment,
        AdviceCategory::Depacos,
        AdviceCategory::Drugstore,
        AdviceCategory::Lifestyle,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AdviceCategory::Analysis => "症状分析",
            AdviceCategory::Treatment => "おすすめ美容医療",
            AdviceCategory::Depacos => "デパコス",
            AdviceCategory::Drugstore => "ドラッグストアコスメ",
            AdviceCategory::Lifestyle => "生活習慣アドバイス",
        }
    }
}
