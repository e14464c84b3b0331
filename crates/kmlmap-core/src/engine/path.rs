use std::fmt::Write;

///
/// PathSegment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathSegment {
    Element(String),
    Property(&'static str),
    Index(usize),
}

/// Render `path` as `Root.Child[1].property`.
pub(crate) fn render_path(path: &[PathSegment], extra: Option<PathSegment>) -> String {
    let mut out = String::new();
    let mut first = true;

    for seg in path.iter().cloned().chain(extra) {
        match seg {
            PathSegment::Element(s) => push_name(&mut out, &s, first),
            PathSegment::Property(s) => push_name(&mut out, s, first),
            PathSegment::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
        }
        first = false;
    }

    out
}

fn push_name(out: &mut String, name: &str, first: bool) {
    if !first {
        out.push('.');
    }
    out.push_str(name);
}
