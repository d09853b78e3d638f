//! HTML shaped like the pages the extractors expect.

pub(crate) fn listing(entries: &[(&str, Option<&str>)]) -> String {
    let entries: String = entries
        .iter()
        .map(|(title, href)| {
            let anchor = match href {
                Some(href) => format!(r#"<a href="{href}">{title}</a>"#),
                None => format!("<a>{title}</a>"),
            };
            format!(r#"<div class="list-group-item flex-column align-items-start media">{anchor}</div>"#)
        })
        .collect();
    format!(r#"<html><body><span class="badge">Modpacks</span><div class="list-group">{entries}</div></body></html>"#)
}

pub(crate) fn detail(download: &str) -> String {
    format!(
        r#"<html><body>
            <a class="btn btn-primary w-100 text-large" href="ror2mm://v1/install/x">Install with Mod Manager</a>
            <a class="btn btn-primary w-100 text-large" href="{download}">Manual Download</a>
        </body></html>"#
    )
}
