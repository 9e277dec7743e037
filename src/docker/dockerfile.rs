/// Assemble a Dockerfile: preambles, then `FROM <base_image>`, then snippets.
///
/// Empty fragments are dropped; the remaining ones are separated by a blank line.
pub fn assemble<S: AsRef<str>>(base_image: &str, preambles: &[S], snippets: &[S]) -> String {
    let from = format!("FROM {}", base_image);

    let sections: Vec<&str> = preambles
        .iter()
        .map(|p| p.as_ref().trim_end())
        .filter(|p| !p.trim().is_empty())
        .chain(std::iter::once(from.as_str()))
        .chain(
            snippets
                .iter()
                .map(|s| s.as_ref().trim_end())
                .filter(|s| !s.trim().is_empty()),
        )
        .collect();

    let mut dockerfile = sections.join("\n\n");
    dockerfile.push('\n');
    dockerfile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_image_only() {
        let out = assemble::<&str>("ubuntu:22.04", &[], &[]);
        assert_eq!(out, "FROM ubuntu:22.04\n");
    }

    #[test]
    fn test_preambles_precede_from() {
        let out = assemble(
            "ubuntu:22.04",
            &["ARG CACHE_BUST=1\n", ""],
            &["RUN echo one\n", "", "USER dev"],
        );
        assert_eq!(
            out,
            "ARG CACHE_BUST=1\n\nFROM ubuntu:22.04\n\nRUN echo one\n\nUSER dev\n"
        );
    }
}
