use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        EditError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        EditError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(EditError::lookup("x").to_string().contains("lookup error:"));
    assert!(
        EditError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(EditError::decode("x").to_string().contains("decode error:"));
    assert!(EditError::network("x").to_string().contains("network error:"));
    assert!(EditError::export("x").to_string().contains("export error:"));
    assert!(EditError::render("x").to_string().contains("render error:"));
    assert!(EditError::offload("x").to_string().contains("offload error:"));
}

#[test]
fn io_converts_through_question_mark() {
    fn open_missing() -> EditResult<()> {
        std::fs::read("/definitely/not/here.png")?;
        Ok(())
    }
    assert!(matches!(open_missing(), Err(EditError::Io(_))));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = EditError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
