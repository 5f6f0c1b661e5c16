use html_escape::{encode_double_quoted_attribute, encode_text};

pub fn text(value: &str) -> String {
    encode_text(value).into_owned()
}

pub fn attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

/// Wraps a rendered body in the shared document shell.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: linear-gradient(135deg, #eff6ff, #ffffff, #dbeafe);
            min-height: 100vh;
            margin: 0;
            padding: 1.5rem;
        }}
        .catalog {{
            max-width: 64rem;
            margin: 0 auto;
            background: white;
            border-radius: 1rem;
            padding: 2rem;
            box-shadow: 0 10px 25px rgba(0,0,0,0.1);
        }}
        .catalog h1 {{ color: #1d4ed8; text-align: center; }}
        .filters {{ display: flex; flex-wrap: wrap; gap: 1rem; margin-bottom: 2rem; }}
        .filters input {{ flex: 1; padding: 0.5rem 1rem; border: 1px solid #ccc; border-radius: 0.5rem; }}
        .filters button {{ background: #2563eb; color: white; border: 0; border-radius: 0.5rem; padding: 0.5rem 1.5rem; }}
        .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1.5rem; }}
        .book-card {{ border: 1px solid #e5e7eb; border-radius: 0.75rem; padding: 1.5rem; }}
        .book-card h2 {{ color: #1d4ed8; margin-top: 0; }}
        .published {{ color: #4b5563; font-size: 0.875rem; }}
        .empty {{ text-align: center; color: #6b7280; }}
        .spinner {{
            width: 40px;
            height: 40px;
            margin: 4rem auto;
            border: 4px solid #bfdbfe;
            border-top-color: #3b82f6;
            border-radius: 50%;
            animation: spin 1s linear infinite;
        }}
        @keyframes spin {{ to {{ transform: rotate(360deg); }} }}
    </style>
</head>
<body>
{}
</body>
</html>
"#,
        text(title),
        body
    )
}
