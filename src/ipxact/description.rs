/// Make a description safe to be used as an RDL string:
/// whitespace runs containing a newline, tab or other non-space character become a single space,
/// other characters outside printable ASCII are dropped and double quotes are replaced by single quotes.
/// Runs of plain spaces are kept as is.
pub fn sanitize(desc: &str) -> String {
    let mut out = String::with_capacity(desc.len());
    let mut chars = desc.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            let mut run = String::from(c);
            while let Some(n) = chars.next_if(|n| n.is_whitespace()) {
                run.push(n);
            }
            if run.chars().all(|w| w == ' ') {
                out.push_str(&run);
            } else {
                out.push(' ');
            }
        } else if matches!(c, ' '..='~') {
            out.push(if c == '"' {'\''} else {c});
        }
    }
    out
}
