use anyhow::Result;
use locator_core::decode;
use locator_runtime::EditorProtocol;

/// Builds the editor URI for an encoded `file:line:column` value
pub fn editor_uri(encoded: &str, editor: EditorProtocol) -> Result<String> {
    let location = decode(encoded)
        .ok_or_else(|| anyhow::anyhow!("Not a file:line:column location: {}", encoded))?;
    Ok(editor.uri(&location))
}

/// Prints the editor URI for an encoded location
pub fn execute_uri(encoded: &str, editor: EditorProtocol) -> Result<()> {
    println!("{}", editor_uri(encoded, editor)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_uri() {
        assert_eq!(
            editor_uri("/src/App.tsx:12:4", EditorProtocol::Cursor).unwrap(),
            "cursor://file//src/App.tsx:12:4"
        );
        assert_eq!(
            editor_uri("/src/App.vue:3:0", EditorProtocol::Zed).unwrap(),
            "zed://file/src/App.vue:3:0"
        );
    }

    #[test]
    fn test_invalid_location() {
        assert!(editor_uri("App.tsx", EditorProtocol::VsCode).is_err());
        assert!(editor_uri("App.tsx:x:1", EditorProtocol::VsCode).is_err());
    }
}
