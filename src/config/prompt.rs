use crate::models::chat::ConversationMessage;

/// Number of trailing conversation turns forwarded to the model.
pub const HISTORY_FOR_PROMPT_LEN: usize = 6;

pub const SYSTEM_INSTRUCTION: &str = "You are Game Architect, an expert browser game developer. \
Every answer MUST be strictly minified JSON of the form {\"reply\":string,\"html\":string} with no text before or after it. \
\"reply\" is a short conversational message to the player. \
\"html\" is a complete, self-contained HTML document (<!DOCTYPE html> through </html>) with all CSS in inline <style> tags and all JavaScript in inline <script> tags. \
The game must run entirely client-side: no external network requests, no CDN links, no imported fonts, images or libraries. \
Prefer <canvas>, CSS and vanilla JavaScript. Keep the document under roughly 60KB. \
The game must be playable with keyboard and/or mouse or touch, show its controls on screen, and include a way to restart.";

pub const RESPONSE_DIRECTIVE: &str = "Respond only with minified JSON matching {\"reply\":string,\"html\":string}. \
Use the reply field to narrate your reasoning: summarize the gameplay, list the controls, and suggest ideas for the next iteration.";

/// Renders the trailing window of the conversation, one `Label: content` line per turn.
pub fn format_transcript(conversation: &[ConversationMessage]) -> String {
    let start = conversation.len().saturating_sub(HISTORY_FOR_PROMPT_LEN);
    conversation[start..]
        .iter()
        .map(|msg| format!("{}: {}", msg.role.transcript_label(), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_instruction(prompt: &str, conversation: &[ConversationMessage]) -> String {
    let mut sections = Vec::with_capacity(3);
    if !conversation.is_empty() {
        sections.push(format!("Conversation so far:\n{}", format_transcript(conversation)));
    }
    sections.push(format!("Latest request:\n{}", prompt));
    sections.push(RESPONSE_DIRECTIVE.to_string());
    sections.join("\n\n")
}
