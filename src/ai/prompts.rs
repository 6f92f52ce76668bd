//! Prompt templates for the two generation calls of a provisioning run.
//!
//! The only variables are the tool name, the storefront page path, and the
//! serialized theme color settings; everything else is fixed wording that
//! the storefront loader depends on (single-tag responses, no body styles).

/// Popup advertisement prompt. The popup's button redirects to the
/// configured storefront page.
pub fn popup_prompt(tool_name: &str, path: &str) -> String {
    format!(
        "Create a popup about {tool_name} tool which contains a button that redirects to \
         /pages/{path}. Design a modern, playful pop-up advertisement UI for the tool. \
         Use bold, quirky fonts, generous padding, and rounded corners. The layout should \
         feel vibrant and humorous, encouraging clicks through cheeky phrasing. Incorporate \
         soft gradients or pastel background elements for visual charm, and place the pop-up \
         over a blurred website backdrop to emphasize focus. Background must be gradient. \
         The popup should have a close button to close the popup - Use inline onclick \
         JavaScript (no external scripts or frameworks). The popup div should not have \
         display none before closing. The response should contain only the code for the \
         popup in a single HTML tag. No explanations or extra output. No images"
    )
}

/// Standalone tool UI prompt, styled with the shop theme's color scheme
/// settings.
pub fn tool_prompt(tool_name: &str, colors: &serde_json::Value) -> String {
    format!(
        "Create a {tool_name} tool. Do not apply any styles to the <body> tag. Generate a \
         responsive form layout with CSS variables for colors and modern UI styling. Do not \
         include any styles for the body tag - keep all styles scoped to classes only. Style \
         the input field with a minimalist aesthetic, rounded corners, subtle shadows, and \
         soft gradients. Use playful, readable fonts and a light color palette with pastel \
         accents. Make the design responsive and visually balanced, ideal for a modern web \
         app interface. The background should use full width of the screen. The tool should \
         be attractive, stylish, engaging, colorful, and user-friendly. Do not apply any \
         styles to the <body> element. No image and do not use domcontentloaded. Keep the \
         eventlistner in the script tag. The response should contain only the code for the \
         tool in a respective tag. No explanations or extra output or meta tags. Use \
         consistent padding, playful transitions, and rounded corners throughout. \
         use this colors : {colors}."
    )
}
