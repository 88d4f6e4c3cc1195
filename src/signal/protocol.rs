/// Classification of one received line of the wire protocol.
///
/// The protocol is deliberately permissive: a line that matches no rule is
/// `Unrecognized` and simply produces no samples. Nothing in here is an
/// error condition.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedLine {
    /// `OUT=<channel>,<v1>,...` frame; channel index already stripped.
    /// May be empty (`OUT=` with no payload is still a recognized frame).
    OutSamples(Vec<f64>),
    /// Generic `<channel>,<v1>,...` CSV frame; channel index stripped.
    CsvSamples(Vec<f64>),
    /// A lone numeric value, from any of the three rules.
    SingleSample(f64),
    /// Matched no framing rule; dropped by the caller after logging.
    Unrecognized,
}

impl ParsedLine {
    pub fn samples(&self) -> &[f64] {
        match self {
            ParsedLine::OutSamples(v) | ParsedLine::CsvSamples(v) => v,
            ParsedLine::SingleSample(v) => std::slice::from_ref(v),
            ParsedLine::Unrecognized => &[],
        }
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Splits on `,` and drops empty fields, matching the framing rules'
/// "skip empty parts" semantics.
fn split_fields(payload: &str) -> Vec<&str> {
    payload.split(',').filter(|p| !p.is_empty()).collect()
}

/// Classifies one trimmed, non-empty line.
///
/// Rules are tried in priority order and the first match wins:
/// 1. `OUT=` frame: field 0 is a channel index and is discarded; fields
///    that fail to parse are silently skipped.
/// 2. CSV frame (contains `,`, does not start with `PARAM=`): field 0
///    discarded, but a single bad field invalidates the whole line.
/// 3. Bare number.
pub fn parse_line(line: &str) -> ParsedLine {
    if starts_with_ignore_case(line, "OUT=") {
        let fields = split_fields(&line[4..]);
        return match fields.len() {
            0 => ParsedLine::OutSamples(Vec::new()),
            1 => match fields[0].parse::<f64>() {
                Ok(v) => ParsedLine::SingleSample(v),
                Err(_) => ParsedLine::Unrecognized,
            },
            _ => {
                let values = fields[1..]
                    .iter()
                    .filter_map(|f| f.parse::<f64>().ok())
                    .collect();
                ParsedLine::OutSamples(values)
            }
        };
    }

    if line.contains(',') && !starts_with_ignore_case(line, "PARAM=") {
        let fields = split_fields(line);
        if fields.len() >= 2 {
            let mut values = Vec::with_capacity(fields.len() - 1);
            for field in &fields[1..] {
                match field.parse::<f64>() {
                    Ok(v) => values.push(v),
                    // All-or-nothing: one bad field rejects the line.
                    Err(_) => return ParsedLine::Unrecognized,
                }
            }
            return ParsedLine::CsvSamples(values);
        }
        if let [only] = fields[..] {
            return match only.parse::<f64>() {
                Ok(v) => ParsedLine::SingleSample(v),
                Err(_) => ParsedLine::Unrecognized,
            };
        }
        // Nothing but commas; bare-number parsing cannot succeed either.
        return ParsedLine::Unrecognized;
    }

    match line.parse::<f64>() {
        Ok(v) => ParsedLine::SingleSample(v),
        Err(_) => ParsedLine::Unrecognized,
    }
}

/// Accumulates raw serial bytes and yields complete `\n`-terminated lines
/// in arrival order. Carriage returns and surrounding whitespace are
/// trimmed; callers skip lines that trim to empty.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pops the oldest complete line, or `None` until a terminator arrives.
    pub fn next_line(&mut self) -> Option<String> {
        let idx = self.buf.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buf.drain(..=idx).take(idx).collect();
        Some(String::from_utf8_lossy(&line).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_frame_discards_channel_index() {
        assert_eq!(
            parse_line("OUT=1,100,200,300"),
            ParsedLine::OutSamples(vec![100.0, 200.0, 300.0])
        );
        // Channel index never reaches the output, whatever it contains.
        assert_eq!(
            parse_line("OUT=garbage,5"),
            ParsedLine::OutSamples(vec![5.0])
        );
    }

    #[test]
    fn out_frame_skips_bad_fields() {
        assert_eq!(
            parse_line("OUT=1,100,bad,100"),
            ParsedLine::OutSamples(vec![100.0, 100.0])
        );
    }

    #[test]
    fn out_frame_may_be_empty() {
        assert_eq!(parse_line("OUT="), ParsedLine::OutSamples(Vec::new()));
        // All fields bad is still a recognized OUT frame, just empty.
        assert_eq!(
            parse_line("OUT=1,x,y"),
            ParsedLine::OutSamples(Vec::new())
        );
    }

    #[test]
    fn out_single_field_parses_as_sample() {
        assert_eq!(parse_line("OUT=42.5"), ParsedLine::SingleSample(42.5));
        assert_eq!(parse_line("OUT=nope"), ParsedLine::Unrecognized);
    }

    #[test]
    fn out_prefix_is_case_insensitive_and_absolute() {
        assert_eq!(
            parse_line("out=1,2,3"),
            ParsedLine::OutSamples(vec![2.0, 3.0])
        );
        // Never reconsidered as CSV even when the OUT payload is junk.
        assert_eq!(parse_line("OUT=a,b,c"), ParsedLine::OutSamples(Vec::new()));
    }

    #[test]
    fn csv_frame_is_all_or_nothing() {
        assert_eq!(
            parse_line("1,100,100,100"),
            ParsedLine::CsvSamples(vec![100.0, 100.0, 100.0])
        );
        assert_eq!(parse_line("1,100,bad,100"), ParsedLine::Unrecognized);
    }

    #[test]
    fn param_lines_are_excluded_from_csv() {
        assert_eq!(parse_line("PARAM=1,2,3,sin"), ParsedLine::Unrecognized);
        assert_eq!(parse_line("param=1.0,2.0,0.0,saw"), ParsedLine::Unrecognized);
    }

    #[test]
    fn csv_single_field_after_empty_removal() {
        assert_eq!(parse_line("7.5,"), ParsedLine::SingleSample(7.5));
        assert_eq!(parse_line("x,"), ParsedLine::Unrecognized);
        assert_eq!(parse_line(",,,"), ParsedLine::Unrecognized);
    }

    #[test]
    fn multibyte_junk_is_just_unrecognized() {
        assert_eq!(parse_line("OU€=1"), ParsedLine::Unrecognized);
    }

    #[test]
    fn bare_number() {
        assert_eq!(parse_line("42.5"), ParsedLine::SingleSample(42.5));
        assert_eq!(parse_line("-1.25e2"), ParsedLine::SingleSample(-125.0));
        assert_eq!(parse_line("hello"), ParsedLine::Unrecognized);
    }

    #[test]
    fn assembler_splits_lines_in_order() {
        let mut asm = LineAssembler::new();
        asm.push_bytes(b"OUT=1,1\r\n2.0\npart");
        assert_eq!(asm.next_line().as_deref(), Some("OUT=1,1"));
        assert_eq!(asm.next_line().as_deref(), Some("2.0"));
        assert_eq!(asm.next_line(), None);
        asm.push_bytes(b"ial\n");
        assert_eq!(asm.next_line().as_deref(), Some("partial"));
    }

    #[test]
    fn assembler_trims_to_empty_for_blank_lines() {
        let mut asm = LineAssembler::new();
        asm.push_bytes(b"  \n");
        assert_eq!(asm.next_line().as_deref(), Some(""));
    }
}
