//! Prompt construction for analysis requests

use crate::providers::AnalysisPrompt;
use crate::results::NormalizedResult;

/// Serialize the target and results into the analysis prompt
pub fn build_prompt(instruction: &str, target: &str, results: &[NormalizedResult]) -> AnalysisPrompt {
    let context = results
        .iter()
        .map(|r| format!("Title: {}\nURL: {}\nSnippet: {}", r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");

    let body = format!(
        "Analyze these search results for \"{}\" and identify security threats. \
         Return JSON only with \"summary\" (string), \"threats\" as an array of objects \
         with \"description\" and \"severity\" (0.0-10.0), and \"recommendations\" \
         as an array of strings.\n\nResults:\n{}",
        target, context
    );

    AnalysisPrompt {
        instruction: instruction.to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_every_result_in_order() {
        let results = vec![
            NormalizedResult::new("Admin", "https://example.com/admin", "Login portal", "Brave Search"),
            NormalizedResult::new("Env", "https://example.com/.env", "DB_PASSWORD", "Brave Search"),
        ];
        let prompt = build_prompt("be terse", "example.com", &results);

        assert_eq!(prompt.instruction, "be terse");
        assert!(prompt.body.contains("\"example.com\""));
        let admin = prompt.body.find("https://example.com/admin").unwrap();
        let env = prompt.body.find("https://example.com/.env").unwrap();
        assert!(admin < env);
        assert!(prompt.body.contains("Snippet: Login portal"));
    }
}
