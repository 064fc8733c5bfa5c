use fresco_core::{ContentBundle, FrescoError, GenerationConfig, OpenAiConfig};

/// A text-completion capability: one instruction in, candidate texts out.
pub trait TextCompleter {
    /// Return the text of every completion choice, in response order.
    fn complete(
        &self,
        instruction: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> impl std::future::Future<Output = Result<Vec<String>, FrescoError>>;
}

/// Build the instruction sent to the completion model.
///
/// # Examples
///
/// ```
/// use fresco_pipeline::prompt::build_instruction;
///
/// let instruction = build_instruction("space opera", "watercolor", "fix bug");
/// assert!(instruction.contains("\"space opera\""));
/// assert!(instruction.contains("creative image description"));
/// ```
pub fn build_instruction(theme: &str, style: &str, content: &str) -> String {
    format!(
        "Generate a creative image description for a fantasy-themed image. \
         The theme is \"{theme}\", the style is \"{style}\", and it should relate \
         to the following pull request content: \"{content}\""
    )
}

/// Cut `instruction` to at most `max_chars` characters.
///
/// The cut is a plain character count with no word or sentence awareness;
/// bounded request cost wins over semantic completeness. Instructions at or
/// under the bound pass through untouched.
///
/// # Examples
///
/// ```
/// use fresco_pipeline::prompt::truncate_instruction;
///
/// assert_eq!(truncate_instruction("hello world", 5), "hello");
/// assert_eq!(truncate_instruction("short", 100), "short");
/// ```
pub fn truncate_instruction(instruction: &str, max_chars: usize) -> String {
    if instruction.chars().count() <= max_chars {
        instruction.to_string()
    } else {
        instruction.chars().take(max_chars).collect()
    }
}

/// Second pipeline stage: turn aggregated PR text into a bounded image prompt.
pub struct PromptSynthesizer<'a, C> {
    completer: &'a C,
    generation: &'a GenerationConfig,
    openai: &'a OpenAiConfig,
}

impl<'a, C: TextCompleter> PromptSynthesizer<'a, C> {
    /// Create a synthesizer backed by `completer`.
    pub fn new(
        completer: &'a C,
        generation: &'a GenerationConfig,
        openai: &'a OpenAiConfig,
    ) -> Self {
        Self {
            completer,
            generation,
            openai,
        }
    }

    /// The exact instruction that would be dispatched for `bundle`,
    /// truncation applied.
    pub fn instruction_for(&self, bundle: &ContentBundle) -> String {
        let instruction = build_instruction(
            &self.generation.theme,
            &self.generation.style,
            &bundle.combined(),
        );
        truncate_instruction(&instruction, self.generation.max_instruction_chars)
    }

    /// Synthesize an image prompt from the bundle.
    ///
    /// Uses the configured token ceiling and sampling temperature; repeated
    /// calls with identical input are not expected to match.
    ///
    /// # Errors
    ///
    /// Returns [`FrescoError::PromptSynthesis`] if the completion call fails,
    /// returns no choices, or the first choice is blank. No fallback prompt
    /// is substituted.
    pub async fn synthesize(&self, bundle: &ContentBundle) -> Result<String, FrescoError> {
        let instruction = self.instruction_for(bundle);
        let choices = self
            .completer
            .complete(&instruction, self.openai.max_tokens, self.openai.temperature)
            .await?;

        let first = choices.first().ok_or_else(|| {
            FrescoError::PromptSynthesis("completion returned no choices".into())
        })?;

        let prompt = first.trim();
        if prompt.is_empty() {
            return Err(FrescoError::PromptSynthesis(
                "completion returned empty text".into(),
            ));
        }
        Ok(prompt.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCompleter {
        choices: Vec<String>,
    }

    impl TextCompleter for FixedCompleter {
        async fn complete(
            &self,
            _instruction: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<Vec<String>, FrescoError> {
            Ok(self.choices.clone())
        }
    }

    fn bundle() -> ContentBundle {
        ContentBundle::from_parts(vec!["great work".into()], vec!["fix bug".into()])
    }

    fn synthesizer_parts() -> (GenerationConfig, OpenAiConfig) {
        (GenerationConfig::default(), OpenAiConfig::default())
    }

    #[test]
    fn instruction_embeds_theme_style_and_content() {
        let instruction = build_instruction("wizard adventure", "artistic", "great work fix bug");
        assert!(instruction.contains("The theme is \"wizard adventure\""));
        assert!(instruction.contains("the style is \"artistic\""));
        assert!(instruction.ends_with("pull request content: \"great work fix bug\""));
    }

    #[test]
    fn truncation_cuts_to_exactly_the_bound() {
        let long = "x".repeat(1500);
        let cut = truncate_instruction(&long, 1000);
        assert_eq!(cut.chars().count(), 1000);
    }

    #[test]
    fn truncation_leaves_bounded_input_unmodified() {
        let short = "a".repeat(1000);
        assert_eq!(truncate_instruction(&short, 1000), short);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let multi = "héllo wörld";
        let cut = truncate_instruction(multi, 6);
        assert_eq!(cut, "héllo ");
    }

    #[test]
    fn truncation_may_sever_a_word() {
        let cut = truncate_instruction("wizard adventure", 9);
        assert_eq!(cut, "wizard ad");
    }

    #[tokio::test]
    async fn synthesize_returns_trimmed_first_choice() {
        let completer = FixedCompleter {
            choices: vec!["  A starship...\n".into(), "ignored".into()],
        };
        let (generation, openai) = synthesizer_parts();
        let synth = PromptSynthesizer::new(&completer, &generation, &openai);
        let prompt = synth.synthesize(&bundle()).await.unwrap();
        assert_eq!(prompt, "A starship...");
    }

    #[tokio::test]
    async fn empty_choice_list_is_an_error() {
        let completer = FixedCompleter { choices: vec![] };
        let (generation, openai) = synthesizer_parts();
        let synth = PromptSynthesizer::new(&completer, &generation, &openai);
        let err = synth.synthesize(&bundle()).await.unwrap_err();
        assert!(matches!(err, FrescoError::PromptSynthesis(_)));
    }

    #[tokio::test]
    async fn whitespace_only_choice_is_an_error() {
        let completer = FixedCompleter {
            choices: vec!["   \n".into()],
        };
        let (generation, openai) = synthesizer_parts();
        let synth = PromptSynthesizer::new(&completer, &generation, &openai);
        let err = synth.synthesize(&bundle()).await.unwrap_err();
        assert!(matches!(err, FrescoError::PromptSynthesis(_)));
    }

    #[test]
    fn instruction_for_applies_the_configured_cap() {
        let completer = FixedCompleter { choices: vec![] };
        let generation = GenerationConfig {
            max_instruction_chars: 50,
            ..GenerationConfig::default()
        };
        let openai = OpenAiConfig::default();
        let synth = PromptSynthesizer::new(&completer, &generation, &openai);
        let big_bundle = ContentBundle::from_parts(vec!["words ".repeat(100)], vec![]);
        assert_eq!(synth.instruction_for(&big_bundle).chars().count(), 50);
    }
}
