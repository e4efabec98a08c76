use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ScoreError::config("x").to_string().contains("config error:"));
    assert!(ScoreError::range("x").to_string().contains("range error:"));
    assert!(
        ScoreError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(ScoreError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScoreError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_converts_with_question_mark() {
    fn inner() -> ScoreResult<()> {
        Err(anyhow::anyhow!("disk full"))?;
        Ok(())
    }
    let err = inner().unwrap_err();
    assert!(matches!(err, ScoreError::Other(_)));
}
