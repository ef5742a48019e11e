//! Prompt templates for research generation

use crate::providers::llm::ChatMessage;

/// Prompt builder for the two generative calls
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instruction for the main answer
    pub const ANSWER_SYSTEM: &'static str =
        "你是一个专业的研究助手，请根据用户的查询提供详细且有用的回答。回答应该准确、全面且易于理解。";

    /// System instruction for the supporting fragments
    pub const FRAGMENT_SYSTEM: &'static str =
        "请生成3-5个与查询相关的文档片段，每个片段应该是独立的信息块，片段之间用空行分隔。";

    /// Messages for the main answer call
    pub fn answer_messages(query: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(Self::ANSWER_SYSTEM),
            ChatMessage::user(format!("请详细回答以下问题：{}", query)),
        ]
    }

    /// Messages for the supporting fragments call
    pub fn fragment_messages(query: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(Self::FRAGMENT_SYSTEM),
            ChatMessage::user(format!("为这个查询生成相关文档片段：{}", query)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_embed_query() {
        let answer = PromptBuilder::answer_messages("量子计算");
        assert_eq!(answer.len(), 2);
        assert_eq!(answer[0].role, "system");
        assert!(answer[1].content.contains("量子计算"));

        let fragments = PromptBuilder::fragment_messages("量子计算");
        assert!(fragments[0].content.contains("3-5"));
        assert!(fragments[1].content.ends_with("量子计算"));
    }
}
