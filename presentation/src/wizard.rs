use anyhow::anyhow;
use colored::Colorize;
use dialoguer::{Input, MultiSelect, Select};
use domain::advice::{AdviceCategory, AdviceResult};
use domain::chat::{ChatMessage, Role, CHAT_APOLOGY};
use domain::concern::{Concern, CONCERNS};
use domain::selection::{Selection, AGE_RANGE};
use domain::wizard::{Wizard, WizardStep};
use shared::confirmation::ask_confirmation;
use shared::types::Result;

use crate::client::ApiClient;

const STEP_LABELS: [&str; 3] = ["悩み選択", "年齢入力", "結果"];

pub const DISCLAIMER: &str = "※ このアドバイスはAIによる一般的な情報提供であり、医療アドバイスではありません。\n具体的な治療については、必ず医師にご相談ください。";

/// `"{age}歳 | 乾燥・毛穴"`; the age part is dropped when undisclosed.
pub fn format_header(selection: &Selection) -> String {
    let names = selection.names("・");
    if selection.age_disclosed() {
        format!("{}歳 | {}", selection.age(), names)
    } else {
        names
    }
}

pub fn format_progress(step: WizardStep) -> String {
    let current = match step {
        WizardStep::Concern => 0,
        WizardStep::Age => 1,
        WizardStep::Result | WizardStep::Chat => 2,
    };
    STEP_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let cell = format!("{} {}", i + 1, label);
            if i == current {
                cell.magenta().bold().to_string()
            } else if i < current {
                cell.bright_magenta().to_string()
            } else {
                cell.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ─ ")
}

/// Every panel in category order, followed by the disclaimer.
pub fn format_result(result: &AdviceResult, expanded: &[AdviceCategory]) -> String {
    let mut lines: Vec<String> = AdviceCategory::ALL
        .into_iter()
        .map(|category| format_panel(category, result, expanded.contains(&category)))
        .collect();
    lines.push(String::new());
    lines.push(DISCLAIMER.dimmed().to_string());
    lines.join("\n")
}

/// A collapsed panel shows only its title; an expanded one also its text.
pub fn format_panel(category: AdviceCategory, result: &AdviceResult, expanded: bool) -> String {
    let marker = if expanded { "▼" } else { "▶" };
    let title = format!("{} {}", marker, category.title()).magenta().bold();
    if expanded {
        format!("{}\n{}\n", title, result.get(category))
    } else {
        title.to_string()
    }
}

pub fn format_message(message: &ChatMessage) -> String {
    let time = message.timestamp.format("%H:%M");
    match message.role {
        Role::User => format!("{} {} {}", "あなた".cyan().bold(), time.to_string().dimmed(), message.text),
        Role::Assistant => format!("{} {} {}", "コンシェルジュ".magenta().bold(), time.to_string().dimmed(), message.text),
    }
}

enum ResultAction {
    Toggle(AdviceCategory),
    ExpandAll,
    Chat,
    Restart,
    Quit,
}

/// Interactive terminal rendition of the concern → age → result wizard.
pub struct WizardApp {
    api: ApiClient,
    wizard: Wizard,
    expanded: Vec<AdviceCategory>,
}

impl WizardApp {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            wizard: Wizard::new(),
            expanded: vec![AdviceCategory::Analysis],
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "美肌コンシェルジュ".magenta().bold());
        loop {
            if self.wizard.step() != WizardStep::Chat {
                println!("\n{}\n", format_progress(self.wizard.step()));
            }
            let keep_going = match self.wizard.step() {
                WizardStep::Concern => self.concern_step()?,
                WizardStep::Age => self.age_step().await?,
                WizardStep::Result => self.result_step()?,
                WizardStep::Chat => self.chat_step().await?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn concern_step(&mut self) -> Result<bool> {
        let items: Vec<String> = CONCERNS
            .iter()
            .map(|c| format!("{} ({})", c.name, c.description))
            .collect();
        let defaults: Vec<bool> = Concern::ALL
            .iter()
            .map(|c| self.wizard.selection().contains(*c))
            .collect();
        let picked = MultiSelect::new()
            .with_prompt("気になる肌の悩みを選んでください（スペースで選択、Enterで決定）")
            .items(&items)
            .defaults(&defaults)
            .interact()?;

        for (idx, concern) in Concern::ALL.into_iter().enumerate() {
            if picked.contains(&idx) != self.wizard.selection().contains(concern) {
                self.wizard.toggle_concern(concern)?;
            }
        }
        if self.wizard.proceed().is_err() {
            println!("{}", "少なくとも1つ選択してください。".yellow());
            return ask_confirmation("選び直しますか？", true);
        }
        Ok(true)
    }

    async fn age_step(&mut self) -> Result<bool> {
        let raw: String = Input::new()
            .with_prompt(format!(
                "年齢を入力してください（{}〜{}、空欄で戻る）",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ))
            .allow_empty(true)
            .interact_text()?;
        let raw = raw.trim();
        if raw.is_empty() {
            self.wizard.back()?;
            return Ok(true);
        }
        let Ok(age) = raw.parse::<u32>() else {
            println!("{}", "数字で入力してください。".yellow());
            return Ok(true);
        };
        if let Err(err) = self.wizard.begin_submit(age) {
            println!("{}", err.to_string().yellow());
            return Ok(true);
        }

        println!("{}", "アドバイスを作成中...".dimmed());
        let result = match self.api.advice(self.wizard.selection()).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "advice request failed, showing fallback");
                AdviceResult::fallback()
            }
        };
        self.wizard.complete(result)?;
        self.expanded = vec![AdviceCategory::Analysis];
        Ok(true)
    }

    fn result_step(&mut self) -> Result<bool> {
        let Some(result) = self.wizard.result().cloned() else {
            self.wizard.restart()?;
            return Ok(true);
        };
        println!("{}", "あなたへの美容アドバイス".bold());
        println!("{}\n", format_header(self.wizard.selection()));
        println!("{}\n", format_result(&result, &self.expanded));

        let mut actions: Vec<(String, ResultAction)> = AdviceCategory::ALL
            .into_iter()
            .map(|c| {
                let verb = if self.expanded.contains(&c) { "閉じる" } else { "開く" };
                (format!("{}を{}", c.title(), verb), ResultAction::Toggle(c))
            })
            .collect();
        actions.push(("すべて開く".to_string(), ResultAction::ExpandAll));
        actions.push(("コンシェルジュに相談する".to_string(), ResultAction::Chat));
        actions.push(("最初からやり直す".to_string(), ResultAction::Restart));
        actions.push(("終了".to_string(), ResultAction::Quit));

        let labels: Vec<&str> = actions.iter().map(|(label, _)| label.as_str()).collect();
        let choice = Select::new()
            .with_prompt("次の操作を選んでください")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions.swap_remove(choice).1 {
            ResultAction::Toggle(category) => {
                if let Some(pos) = self.expanded.iter().position(|c| *c == category) {
                    self.expanded.remove(pos);
                } else {
                    self.expanded.push(category);
                }
            }
            ResultAction::ExpandAll => self.expanded = AdviceCategory::ALL.to_vec(),
            ResultAction::Chat => {
                let session = self.wizard.open_chat()?;
                for message in session.messages() {
                    println!("{}", format_message(message));
                }
            }
            ResultAction::Restart => self.wizard.restart()?,
            ResultAction::Quit => return Ok(!ask_confirmation("終了しますか？", true)?),
        }
        Ok(true)
    }

    async fn chat_step(&mut self) -> Result<bool> {
        let input: String = Input::new()
            .with_prompt("メッセージ（空欄で結果に戻る）")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        if input.is_empty() {
            self.wizard.close_chat()?;
            return Ok(true);
        }

        let selection = self.wizard.selection().clone();
        let session = self
            .wizard
            .chat_mut()
            .ok_or_else(|| anyhow!("chat step without a session"))?;
        let history = session.history();
        session.push_user(input);

        let reply = match self.api.chat(input, &selection, history).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "chat request failed");
                CHAT_APOLOGY.to_string()
            }
        };
        println!("{}", format_message(session.push_assistant(reply)));
        Ok(true)
    }
}
