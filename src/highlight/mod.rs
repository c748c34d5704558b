// ── wg-quick configuration lexer ──────────────────────────────────────────────
//
// Splits a configuration into coloured spans for the syntax edit control.
// Works on byte offsets into the `&str` it is given; `utf16_ranges` converts
// them to the character positions the rich-edit control uses.
// No Win32 imports; pure Rust.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::Range;

use crate::keys::Key;

// ── Span types ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Section,
    Field,
    PrivateKey,
    PublicKey,
    PresharedKey,
    Ip,
    Cidr,
    Host,
    Port,
    Mtu,
    Keepalive,
    Comment,
    Delimiter,
    Table,
    FwMark,
    SaveConfig,
    Cmd,
    Error,
}

/// A coloured run of text.  `start..end` are byte offsets, never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// ── Sections and fields ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Interface,
    Peer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    PrivateKey,
    PublicKey,
    PresharedKey,
    Port,
    FwMark,
    CidrList,
    DnsList,
    Mtu,
    Table,
    Cmd,
    SaveConfig,
    Endpoint,
    Keepalive,
}

static INTERFACE_FIELDS: &[(&str, FieldType)] = &[
    ("PrivateKey", FieldType::PrivateKey),
    ("ListenPort", FieldType::Port),
    ("FwMark", FieldType::FwMark),
    ("Address", FieldType::CidrList),
    ("DNS", FieldType::DnsList),
    ("MTU", FieldType::Mtu),
    ("Table", FieldType::Table),
    ("PreUp", FieldType::Cmd),
    ("PostUp", FieldType::Cmd),
    ("PreDown", FieldType::Cmd),
    ("PostDown", FieldType::Cmd),
    ("SaveConfig", FieldType::SaveConfig),
];

static PEER_FIELDS: &[(&str, FieldType)] = &[
    ("PublicKey", FieldType::PublicKey),
    ("PresharedKey", FieldType::PresharedKey),
    ("AllowedIPs", FieldType::CidrList),
    ("Endpoint", FieldType::Endpoint),
    ("PersistentKeepalive", FieldType::Keepalive),
];

/// Smallest MTU wg-quick accepts (the IPv4 minimum datagram size).
const MIN_MTU: u32 = 576;

fn section_from_header(header: &str) -> Option<Section> {
    let name = header.strip_prefix('[')?.strip_suffix(']')?;
    if name.eq_ignore_ascii_case("Interface") {
        Some(Section::Interface)
    } else if name.eq_ignore_ascii_case("Peer") {
        Some(Section::Peer)
    } else {
        None
    }
}

fn field_type(section: Section, name: &str) -> Option<FieldType> {
    let table = match section {
        Section::Interface => INTERFACE_FIELDS,
        Section::Peer => PEER_FIELDS,
    };
    table
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .map(|&(_, ty)| ty)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Lex `text` into sorted, non-overlapping spans.
///
/// Unhighlighted gaps (whitespace, unknown trailing text) are simply absent.
pub fn highlight(text: &str) -> Vec<Span> {
    let mut lexer = Lexer { spans: Vec::new() };
    let mut section = None;
    for (offset, line) in split_lines(text) {
        lexer.line(offset, line, &mut section);
    }
    lexer.spans
}

/// The single valid `[Interface]` private key, or `None` when there is none
/// or more than one.
pub fn private_key(text: &str) -> Option<String> {
    private_key_from_spans(text, &highlight(text))
}

/// Same as [`private_key`] for callers that already lexed `text`.
pub fn private_key_from_spans(text: &str, spans: &[Span]) -> Option<String> {
    let mut keys = spans.iter().filter(|s| s.kind == SpanKind::PrivateKey);
    let first = keys.next()?;
    if keys.next().is_some() {
        return None;
    }
    text.get(first.range()).map(str::to_owned)
}

/// Convert byte spans over `text` to UTF-16 code-unit ranges.
///
/// `spans` must be sorted and non-overlapping, as returned by [`highlight`].
pub fn utf16_ranges(text: &str, spans: &[Span]) -> Vec<Range<usize>> {
    let mut chars = text.char_indices().peekable();
    let mut units = 0usize;
    let mut to_units = |byte: usize| {
        while let Some(&(i, c)) = chars.peek() {
            if i >= byte {
                break;
            }
            units += c.len_utf16();
            chars.next();
        }
        units
    };
    spans
        .iter()
        .map(|s| {
            let start = to_units(s.start);
            start..to_units(s.end)
        })
        .collect()
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer {
    spans: Vec<Span>,
}

impl Lexer {
    fn push(&mut self, kind: SpanKind, start: usize, end: usize) {
        if start < end {
            self.spans.push(Span { kind, start, end });
        }
    }

    fn line(&mut self, base: usize, line: &str, section: &mut Option<Section>) {
        let comment = line.find('#');
        let content = &line[..comment.unwrap_or(line.len())];
        let (s, e) = trim_range(content, 0, content.len());

        if s < e {
            let body = &content[s..e];
            if body.starts_with('[') {
                *section = section_from_header(body);
                let kind = if section.is_some() {
                    SpanKind::Section
                } else {
                    SpanKind::Error
                };
                self.push(kind, base + s, base + e);
            } else {
                self.assignment(base, content, s..e, *section);
            }
        }

        if let Some(hash) = comment {
            self.push(SpanKind::Comment, base + hash, base + line.len());
        }
    }

    fn assignment(
        &mut self,
        base: usize,
        content: &str,
        body: Range<usize>,
        section: Option<Section>,
    ) {
        let Some(eq) = content[body.clone()].find('=').map(|i| body.start + i) else {
            self.push(SpanKind::Error, base + body.start, base + body.end);
            return;
        };

        let (ks, ke) = trim_range(content, body.start, eq);
        let field = section.and_then(|sec| field_type(sec, &content[ks..ke]));
        let key_kind = if field.is_some() {
            SpanKind::Field
        } else {
            SpanKind::Error
        };
        self.push(key_kind, base + ks, base + ke);

        let (vs, ve) = trim_range(content, eq + 1, body.end);
        if vs == ve {
            self.push(SpanKind::Error, base + eq, base + eq + 1);
            return;
        }
        self.push(SpanKind::Delimiter, base + eq, base + eq + 1);

        match field {
            Some(ty) => self.value(ty, base + vs, &content[vs..ve]),
            None => self.push(SpanKind::Error, base + vs, base + ve),
        }
    }

    fn value(&mut self, ty: FieldType, base: usize, v: &str) {
        let end = base + v.len();
        let single = |ok: bool, kind: SpanKind| if ok { kind } else { SpanKind::Error };
        match ty {
            FieldType::PrivateKey => {
                let kind = single(Key::from_base64(v).is_some(), SpanKind::PrivateKey);
                self.push(kind, base, end);
            }
            FieldType::PublicKey => {
                let kind = single(Key::from_base64(v).is_some(), SpanKind::PublicKey);
                self.push(kind, base, end);
            }
            FieldType::PresharedKey => {
                let kind = single(Key::from_base64(v).is_some(), SpanKind::PresharedKey);
                self.push(kind, base, end);
            }
            FieldType::Port => {
                self.push(single(parse_port(v).is_some(), SpanKind::Port), base, end);
            }
            FieldType::Mtu => {
                let ok = parse_decimal(v).is_some_and(|m| (MIN_MTU..=65535).contains(&m));
                self.push(single(ok, SpanKind::Mtu), base, end);
            }
            FieldType::Keepalive => {
                let ok = v.eq_ignore_ascii_case("off") || parse_port(v).is_some();
                self.push(single(ok, SpanKind::Keepalive), base, end);
            }
            FieldType::Table => {
                let ok = v.eq_ignore_ascii_case("off")
                    || v.eq_ignore_ascii_case("auto")
                    || parse_decimal(v).is_some();
                self.push(single(ok, SpanKind::Table), base, end);
            }
            FieldType::FwMark => {
                let ok = v.eq_ignore_ascii_case("off") || parse_u32_any_radix(v).is_some();
                self.push(single(ok, SpanKind::FwMark), base, end);
            }
            FieldType::SaveConfig => {
                let ok = v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false");
                self.push(single(ok, SpanKind::SaveConfig), base, end);
            }
            FieldType::Cmd => self.push(SpanKind::Cmd, base, end),
            FieldType::CidrList => self.list(base, v, Self::cidr),
            FieldType::DnsList => self.list(base, v, Self::dns_entry),
            FieldType::Endpoint => self.endpoint(base, v),
        }
    }

    /// Comma-separated values; empty items are skipped.
    fn list(&mut self, base: usize, v: &str, item: fn(&mut Self, usize, &str)) {
        let mut from = 0;
        let commas = v.match_indices(',').map(|(i, _)| i);
        for comma in commas.chain(std::iter::once(v.len())) {
            let (s, e) = trim_range(v, from, comma);
            if s < e {
                item(self, base + s, &v[s..e]);
            }
            if comma < v.len() {
                self.push(SpanKind::Delimiter, base + comma, base + comma + 1);
            }
            from = comma + 1;
        }
    }

    fn cidr(&mut self, base: usize, item: &str) {
        let (addr, prefix) = match item.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (item, None),
        };
        let Ok(ip) = addr.parse::<IpAddr>() else {
            self.push(SpanKind::Error, base, base + item.len());
            return;
        };
        let Some(prefix) = prefix else {
            self.push(SpanKind::Ip, base, base + addr.len());
            return;
        };
        let max = if ip.is_ipv4() { 32 } else { 128 };
        if parse_decimal(prefix).is_some_and(|n| n <= max) {
            let slash = base + addr.len();
            self.push(SpanKind::Ip, base, slash);
            self.push(SpanKind::Delimiter, slash, slash + 1);
            self.push(SpanKind::Cidr, slash + 1, base + item.len());
        } else {
            self.push(SpanKind::Error, base, base + item.len());
        }
    }

    fn dns_entry(&mut self, base: usize, item: &str) {
        let kind = if item.parse::<IpAddr>().is_ok() {
            SpanKind::Ip
        } else if is_hostname(item) {
            SpanKind::Host
        } else {
            SpanKind::Error
        };
        self.push(kind, base, base + item.len());
    }

    /// `host:port`, `a.b.c.d:port` or `[v6]:port`.
    fn endpoint(&mut self, base: usize, v: &str) {
        let end = base + v.len();

        if let Some(rest) = v.strip_prefix('[') {
            let Some(close) = rest.find(']') else {
                self.push(SpanKind::Error, base, end);
                return;
            };
            let host = &rest[..close];
            let Some(port) = rest[close + 1..].strip_prefix(':') else {
                self.push(SpanKind::Error, base, end);
                return;
            };
            if host.is_empty() || port.is_empty() {
                self.push(SpanKind::Error, base, end);
                return;
            }
            let host_start = base + 1;
            let host_end = host_start + close;
            let host_kind = if host.parse::<Ipv6Addr>().is_ok() {
                SpanKind::Ip
            } else {
                SpanKind::Error
            };
            self.push(SpanKind::Delimiter, base, host_start);
            self.push(host_kind, host_start, host_end);
            self.push(SpanKind::Delimiter, host_end, host_end + 2);
            self.endpoint_port(host_end + 2, port);
            return;
        }

        let Some((host, port)) = v
            .rsplit_once(':')
            .filter(|(host, port)| !host.is_empty() && !port.is_empty())
        else {
            self.push(SpanKind::Error, base, end);
            return;
        };
        let host_kind = if host.parse::<Ipv4Addr>().is_ok() {
            SpanKind::Ip
        } else if is_hostname(host) {
            SpanKind::Host
        } else {
            SpanKind::Error
        };
        let colon = base + host.len();
        self.push(host_kind, base, colon);
        self.push(SpanKind::Delimiter, colon, colon + 1);
        self.endpoint_port(colon + 1, port);
    }

    fn endpoint_port(&mut self, base: usize, port: &str) {
        let kind = if parse_port(port).is_some_and(|p| p != 0) {
            SpanKind::Port
        } else {
            SpanKind::Error
        };
        self.push(kind, base, base + port.len());
    }
}

// ── Scanning helpers ──────────────────────────────────────────────────────────

/// Split on `\r\n`, `\n` or a bare `\r` (rich-edit's internal line break),
/// yielding each line's byte offset and text without its terminator.
fn split_lines(text: &str) -> Vec<(usize, &str)> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((start, &text[start..i]));
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push((start, &text[start..i]));
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push((start, &text[start..]));
    }
    lines
}

/// Narrow `s[from..to]` past ASCII whitespace on both ends.
fn trim_range(s: &str, mut from: usize, mut to: usize) -> (usize, usize) {
    let bytes = s.as_bytes();
    while from < to && bytes[from].is_ascii_whitespace() {
        from += 1;
    }
    while to > from && bytes[to - 1].is_ascii_whitespace() {
        to -= 1;
    }
    (from, to)
}

/// Unsigned decimal with no sign, no whitespace and no empty string.
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_port(s: &str) -> Option<u16> {
    parse_decimal(s).and_then(|n| u16::try_from(n).ok())
}

fn parse_u32_any_radix(s: &str) -> Option<u32> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()
        }
        Some(_) => None,
        None => parse_decimal(s),
    }
}

/// RFC 1123 host name.  A purely numeric last label is rejected so that
/// malformed dotted quads like `300.1.1.1` don't pass as host names.
fn is_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    let labels_ok = s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });
    let tld_numeric = s
        .rsplit('.')
        .next()
        .is_some_and(|tld| tld.bytes().all(|b| b.is_ascii_digit()));
    labels_ok && !tld_numeric
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "[Interface]
PrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=
Address = 192.168.4.84/24
DNS = 8.8.8.8, 8.8.4.4, 1.1.1.1, 1.0.0.1

[Peer]
PublicKey = JRI8Xc0zKP9kXk8qP84NdUQA04h6DLfFbwJn4g+/PFs=
Endpoint = demo.wireguard.com:12912
AllowedIPs = 0.0.0.0/0
";

    fn lexed(text: &str) -> Vec<(SpanKind, &str)> {
        highlight(text)
            .into_iter()
            .map(|s| (s.kind, &text[s.range()]))
            .collect()
    }

    fn kinds(text: &str) -> Vec<SpanKind> {
        highlight(text).into_iter().map(|s| s.kind).collect()
    }

    // ── Whole documents ──────────────────────────────────────────────────────

    #[test]
    fn demo_config_has_no_errors() {
        assert!(!kinds(DEMO).contains(&SpanKind::Error));
    }

    #[test]
    fn spans_are_sorted_and_non_empty() {
        let spans = highlight(DEMO);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start, "{pair:?} overlap");
        }
        assert!(spans.iter().all(|s| s.start < s.end));
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(highlight("").is_empty());
        assert!(highlight("\r\n\n  \r").is_empty());
    }

    // ── Sections ─────────────────────────────────────────────────────────────

    #[test]
    fn section_headers_case_insensitive() {
        assert_eq!(lexed("[interface]"), vec![(SpanKind::Section, "[interface]")]);
        assert_eq!(lexed("  [PEER]  "), vec![(SpanKind::Section, "[PEER]")]);
    }

    #[test]
    fn unknown_section_poisons_following_fields() {
        let text = "[Bogus]\nMTU = 1420";
        assert_eq!(
            lexed(text),
            vec![
                (SpanKind::Error, "[Bogus]"),
                (SpanKind::Error, "MTU"),
                (SpanKind::Delimiter, "="),
                (SpanKind::Error, "1420"),
            ]
        );
    }

    #[test]
    fn field_before_any_section_is_error() {
        assert_eq!(kinds("MTU = 1420")[0], SpanKind::Error);
    }

    #[test]
    fn field_in_wrong_section_is_error() {
        let text = "[Peer]\nListenPort = 51820";
        assert_eq!(lexed(text)[1], (SpanKind::Error, "ListenPort"));
    }

    // ── Assignments ──────────────────────────────────────────────────────────

    #[test]
    fn private_key_line() {
        let text = "[Interface]\nPrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=";
        assert_eq!(
            lexed(text)[1..],
            [
                (SpanKind::Field, "PrivateKey"),
                (SpanKind::Delimiter, "="),
                (SpanKind::PrivateKey, "6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI="),
            ]
        );
    }

    #[test]
    fn short_key_is_error() {
        let text = "[Peer]\nPublicKey = JRI8Xc0zKP9kXk8q";
        assert_eq!(lexed(text)[3], (SpanKind::Error, "JRI8Xc0zKP9kXk8q"));
    }

    #[test]
    fn missing_equals_is_error() {
        assert_eq!(
            lexed("[Interface]\nPrivateKey"),
            vec![(SpanKind::Section, "[Interface]"), (SpanKind::Error, "PrivateKey")]
        );
    }

    #[test]
    fn empty_value_marks_delimiter_as_error() {
        assert_eq!(
            lexed("[Interface]\nMTU =  ")[1..],
            [(SpanKind::Field, "MTU"), (SpanKind::Error, "=")]
        );
    }

    #[test]
    fn address_list_with_prefixes() {
        let text = "[Interface]\nAddress = 10.0.0.2/32, fd00::2/128";
        assert_eq!(
            lexed(text)[3..],
            [
                (SpanKind::Ip, "10.0.0.2"),
                (SpanKind::Delimiter, "/"),
                (SpanKind::Cidr, "32"),
                (SpanKind::Delimiter, ","),
                (SpanKind::Ip, "fd00::2"),
                (SpanKind::Delimiter, "/"),
                (SpanKind::Cidr, "128"),
            ]
        );
    }

    #[test]
    fn oversized_prefix_is_error() {
        let text = "[Peer]\nAllowedIPs = 10.0.0.0/33, ::/129";
        let spans = lexed(text);
        assert!(spans.contains(&(SpanKind::Error, "10.0.0.0/33")));
        assert!(spans.contains(&(SpanKind::Error, "::/129")));
    }

    #[test]
    fn dns_accepts_ips_and_search_domains() {
        let text = "[Interface]\nDNS = 1.1.1.1, corp.example.com, 300.1.1.1";
        let spans = lexed(text);
        assert!(spans.contains(&(SpanKind::Ip, "1.1.1.1")));
        assert!(spans.contains(&(SpanKind::Host, "corp.example.com")));
        assert!(spans.contains(&(SpanKind::Error, "300.1.1.1")));
    }

    #[test]
    fn endpoint_host_and_port() {
        let text = "[Peer]\nEndpoint = demo.wireguard.com:12912";
        assert_eq!(
            lexed(text)[3..],
            [
                (SpanKind::Host, "demo.wireguard.com"),
                (SpanKind::Delimiter, ":"),
                (SpanKind::Port, "12912"),
            ]
        );
    }

    #[test]
    fn endpoint_bracketed_ipv6() {
        let text = "[Peer]\nEndpoint = [2001:db8::1]:51820";
        assert_eq!(
            lexed(text)[3..],
            [
                (SpanKind::Delimiter, "["),
                (SpanKind::Ip, "2001:db8::1"),
                (SpanKind::Delimiter, "]:"),
                (SpanKind::Port, "51820"),
            ]
        );
    }

    #[test]
    fn endpoint_errors_are_localised() {
        let spans = lexed("[Peer]\nEndpoint = 10.0.0.1:99999");
        assert_eq!(spans[3], (SpanKind::Ip, "10.0.0.1"));
        assert_eq!(spans[5], (SpanKind::Error, "99999"));

        let spans = lexed("[Peer]\nEndpoint = 2001:db8::1:51820");
        assert_eq!(spans[3].0, SpanKind::Error);

        let spans = lexed("[Peer]\nEndpoint = example.com");
        assert_eq!(spans[3], (SpanKind::Error, "example.com"));

        // An empty host or port makes the whole value an error.
        for value in [":51820", "example.com:", "[::1]:", "[]:51820"] {
            let text = format!("[Peer]\nEndpoint = {value}");
            let spans = lexed(&text);
            assert_eq!(spans.len(), 4, "{value}");
            assert_eq!(spans[3], (SpanKind::Error, value));
        }
    }

    #[test]
    fn numeric_fields_validate_ranges() {
        assert_eq!(kinds("[Interface]\nMTU = 1420")[3], SpanKind::Mtu);
        assert_eq!(kinds("[Interface]\nMTU = 500")[3], SpanKind::Error);
        assert_eq!(kinds("[Interface]\nListenPort = 51820")[3], SpanKind::Port);
        assert_eq!(kinds("[Interface]\nListenPort = +1")[3], SpanKind::Error);
        assert_eq!(kinds("[Peer]\nPersistentKeepalive = off")[3], SpanKind::Keepalive);
        assert_eq!(kinds("[Peer]\nPersistentKeepalive = 25")[3], SpanKind::Keepalive);
        assert_eq!(kinds("[Peer]\nPersistentKeepalive = 70000")[3], SpanKind::Error);
    }

    #[test]
    fn table_fwmark_and_saveconfig() {
        assert_eq!(kinds("[Interface]\nTable = auto")[3], SpanKind::Table);
        assert_eq!(kinds("[Interface]\nTable = 1234")[3], SpanKind::Table);
        assert_eq!(kinds("[Interface]\nTable = main")[3], SpanKind::Error);
        assert_eq!(kinds("[Interface]\nFwMark = 0xca6c")[3], SpanKind::FwMark);
        assert_eq!(kinds("[Interface]\nFwMark = 0x")[3], SpanKind::Error);
        assert_eq!(kinds("[Interface]\nSaveConfig = true")[3], SpanKind::SaveConfig);
        assert_eq!(kinds("[Interface]\nSaveConfig = yes")[3], SpanKind::Error);
    }

    #[test]
    fn commands_take_rest_of_line_up_to_comment() {
        let text = "[Interface]\nPostUp = iptables -A FORWARD -i %i -j ACCEPT # nat";
        assert_eq!(
            lexed(text)[3..],
            [
                (SpanKind::Cmd, "iptables -A FORWARD -i %i -j ACCEPT"),
                (SpanKind::Comment, "# nat"),
            ]
        );
    }

    #[test]
    fn comment_only_lines() {
        assert_eq!(lexed("  # hello"), vec![(SpanKind::Comment, "# hello")]);
    }

    // ── Line endings ─────────────────────────────────────────────────────────

    #[test]
    fn bare_carriage_returns_split_lines() {
        let text = "[Interface]\rMTU = 1420\r\n[Peer]";
        assert_eq!(
            kinds(text),
            vec![
                SpanKind::Section,
                SpanKind::Field,
                SpanKind::Delimiter,
                SpanKind::Mtu,
                SpanKind::Section,
            ]
        );
    }

    // ── Private key extraction ───────────────────────────────────────────────

    #[test]
    fn private_key_from_demo() {
        assert_eq!(
            private_key(DEMO).as_deref(),
            Some("6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=")
        );
    }

    #[test]
    fn no_private_key_when_missing_or_invalid() {
        assert_eq!(private_key("[Interface]\nMTU = 1420"), None);
        assert_eq!(private_key("[Interface]\nPrivateKey = nope"), None);
        // Only valid in [Interface].
        assert_eq!(
            private_key("[Peer]\nPrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI="),
            None
        );
    }

    #[test]
    fn duplicate_private_keys_yield_none() {
        let text = "[Interface]
PrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=
PrivateKey = JRI8Xc0zKP9kXk8qP84NdUQA04h6DLfFbwJn4g+/PFs=";
        assert_eq!(private_key(text), None);
    }

    // ── UTF-16 mapping ───────────────────────────────────────────────────────

    #[test]
    fn utf16_ranges_account_for_wide_characters() {
        // "é" is 2 bytes / 1 unit, "😀" is 4 bytes / 2 units.
        let text = "# é😀\r[Peer]";
        let spans = highlight(text);
        let ranges = utf16_ranges(text, &spans);
        assert_eq!(ranges, vec![0..5, 6..12]);
        let wide: Vec<u16> = text.encode_utf16().collect();
        assert_eq!(String::from_utf16_lossy(&wide[6..12]), "[Peer]");
    }

    #[test]
    fn utf16_ranges_match_bytes_for_ascii() {
        let spans = highlight(DEMO);
        let ranges = utf16_ranges(DEMO, &spans);
        for (span, range) in spans.iter().zip(&ranges) {
            assert_eq!(span.range(), *range);
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    #[test]
    fn hostname_rules() {
        assert!(is_hostname("demo.wireguard.com"));
        assert!(is_hostname("localhost"));
        assert!(!is_hostname("-bad.example"));
        assert!(!is_hostname("a..b"));
        assert!(!is_hostname("1.2.3.4"));
        assert!(!is_hostname("under_score.example"));
    }
}
