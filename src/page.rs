//! Page module
//!
//! The rendered outcome of a request plus the HTML templates used to build it.
//! Every page is `text/html`; error pages share one template.

use crate::error::DispatchError;
use hyper::StatusCode;

pub const CONTENT_TYPE: &str = "text/html";

/// A response ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: StatusCode,
    body: Vec<u8>,
}

impl Page {
    /// 200 page with the given body
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    /// Render an error through the single error template.
    ///
    /// The status stays 200 unless `strict_status` is set, in which case
    /// missing and escaping paths become 404 and everything else 500.
    pub fn error(err: &DispatchError, strict_status: bool) -> Self {
        let status = if strict_status {
            status_for(err)
        } else {
            StatusCode::OK
        };
        Self {
            status,
            body: render_error(err.path(), &err.to_string()).into_bytes(),
        }
    }

    pub const fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

fn status_for(err: &DispatchError) -> StatusCode {
    use crate::error::ErrorKind;
    match err.kind() {
        ErrorKind::ResourceNotFound | ErrorKind::OutsideRoot => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error page: offending path and message
pub fn render_error(path: &str, message: &str) -> String {
    format!(
        "<html>\n<body>\n<h1>Error accessing {}</h1>\n<p>{}</p>\n</body>\n</html>\n",
        escape_html(path),
        escape_html(message)
    )
}

/// Directory listing: one `<li>` per entry, hidden names skipped
pub fn render_listing<I, S>(entries: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = entries
        .into_iter()
        .filter(|name| !name.as_ref().starts_with('.'))
        .map(|name| format!("<li>{}</li>", escape_html(name.as_ref())))
        .collect();
    format!(
        "<html>\n<body>\n<ul>{}</ul>\n</body>\n</html>\n",
        items.join("\n")
    )
}

/// Values shown by the request-echo page
#[derive(Debug, Clone)]
pub struct EchoInfo<'a> {
    pub date_time: String,
    pub client_host: String,
    pub client_port: u16,
    pub command: &'a str,
    pub path: &'a str,
}

pub fn render_echo(info: &EchoInfo<'_>) -> String {
    format!(
        "<html>
<body>
<table>
<tr>  <td>Header</td>         <td>Value</td>          </tr>
<tr>  <td>Date and time</td>  <td>{}</td>    </tr>
<tr>  <td>Client host</td>    <td>{}</td>  </tr>
<tr>  <td>Client port</td>    <td>{}</td> </tr>
<tr>  <td>Command</td>        <td>{}</td>      </tr>
<tr>  <td>Path</td>           <td>{}</td>         </tr>
</table>
</body>
</html>
",
        escape_html(&info.date_time),
        escape_html(&info.client_host),
        info.client_port,
        escape_html(info.command),
        escape_html(info.path),
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
