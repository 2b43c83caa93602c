use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PublishParams {
    pub(crate) prompt: Option<String>,
}

impl PublishParams {
    /// The prompt, if one was given and it is not empty.
    pub(crate) fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|prompt| !prompt.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_counts_as_missing() {
        let params = PublishParams {
            prompt: Some(String::new()),
        };
        assert_eq!(params.prompt(), None);
        assert_eq!(PublishParams::default().prompt(), None);

        let params = PublishParams {
            prompt: Some("foo".to_string()),
        };
        assert_eq!(params.prompt(), Some("foo"));
    }
}
