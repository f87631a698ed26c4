use crate::ai::dto::{GenerationRequest, PromptParts};

const TITLE_RULES: &str =
    "Answer with the title only: 2-6 words, no quotes, no trailing period.";

pub fn build_prompt(request: &GenerationRequest, language: &str) -> PromptParts {
    match request {
        GenerationRequest::NameTopic { keywords } => PromptParts {
            instructions: format!(
                "Generate a short topic title in {} from the given keywords. {}",
                language, TITLE_RULES
            ),
            input: format!("Keywords: {}\nTopic title:", keywords.join(", ")),
        },
        GenerationRequest::SummarizeChunk { theme, chunk } => PromptParts {
            instructions: format!(
                "Summarize a fragment of a group chat in {}. Be concrete, no filler. \
                 Format: 5-12 bullet points. Keep technical details (commands, protocols, \
                 errors) when present.",
                language
            ),
            input: format!(
                "Topic: {}\n\nMessages:\n<<<\n{}\n>>>\n\nBullet summary:",
                theme, chunk
            ),
        },
        GenerationRequest::ReduceSummaries { theme, summaries } => PromptParts {
            instructions: format!(
                "Compress a set of summaries into one shorter summary in {}. Remove \
                 repetition, keep key facts and conclusions. Format: no more than 12 bullet \
                 points. The result must not be longer than the input.",
                language
            ),
            input: format!(
                "Topic: {}\n\nFragment summaries:\n<<<\n{}\n>>>\n\nFinal bullet summary:",
                theme, summaries
            ),
        },
        GenerationRequest::UpdateWithPrevious {
            theme,
            previous_summary,
            summary,
        } => PromptParts {
            instructions: format!(
                "Update a topic summary in {} using the previous summary and a new one. \
                 Remove repetition, keep key facts. Format: no more than 12 bullet points.",
                language
            ),
            input: format!(
                "Topic: {}\n\nPrevious summary:\n<<<\n{}\n>>>\n\nNew summary:\n<<<\n{}\n>>>\n\n\
                 Updated bullet summary:",
                theme, previous_summary, summary
            ),
        },
        GenerationRequest::RefineTopicName { keywords, summary } => PromptParts {
            instructions: format!(
                "You write a short, precise title in {} for a discussion. {} \
                 Do not invent entities that are not in the keywords or the summary.",
                language, TITLE_RULES
            ),
            input: format!(
                "Keywords: {}\n\nDiscussion summary:\n{}\n\nTopic title:",
                keywords.join(", "),
                summary
            ),
        },
    }
}
