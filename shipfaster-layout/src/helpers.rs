//! Built-in Handlebars helpers

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};

/// Register all built-in helpers
pub fn register_builtin_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("json_script", Box::new(json_script_helper));
}

/// Serialize JSON for embedding inside a `<script>` element.
///
/// `<`, `>` and `&` are written as unicode escapes so the payload can never
/// close the element, as are the JS line terminators U+2028 and U+2029.
pub fn script_safe_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

/// `{{{json_script value}}}`: value as script-safe JSON
fn json_script_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("json_script", 0))?;

    out.write(&script_safe_json(param.value()))?;
    Ok(())
}
