use super::{DecodeError, Event, LoadEntry, LogEvent, MatchEntry};
use crate::model::network::{CustomerId, NodeId, Tick, VehicleId};
use std::str::FromStr;

/// decodes one dataout line.
///
/// fields are separated by single spaces. field 0 is the tick, field 1 a
/// single-character tag and the remaining fields are tag-specific.
///
/// # Returns
///
/// - `Ok(None)` for a blank line, which carries no event
/// - `Ok(Some(LogEvent))` for a well-formed line
/// - `Err(DecodeError)` for an unknown tag or a malformed field. the caller
///   is expected to report and skip the line.
pub fn decode(line: &str) -> Result<Option<LogEvent>, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let mut fields = line.split(' ');
    let tick: Tick = parse_field(fields.next(), "tick")?;
    let tag = fields.next().ok_or(DecodeError::MissingField("tag"))?;
    let payload: Vec<&str> = fields.collect();

    let event = match tag {
        "R" => {
            let (vehicle_id, rest) = split_vehicle(&payload)?;
            if rest.is_empty() {
                return Err(DecodeError::MissingField("route node"));
            }
            Event::RouteAssigned {
                vehicle_id,
                nodes: parse_all(rest, "route node")?,
            }
        }
        "V" => {
            if payload.len() != 3 {
                return Err(DecodeError::UnexpectedFieldCount {
                    tag: 'V',
                    expected: 3,
                    found: payload.len(),
                });
            }
            Event::VehicleSample {
                vehicle_id: parse_field(Some(payload[0]), "vehicle id")?,
                current_node: parse_field(Some(payload[1]), "current node")?,
                overshoot: parse_field(Some(payload[2]), "overshoot")?,
            }
        }
        "P" => Event::Pickup {
            customer_ids: parse_all::<CustomerId>(&payload, "customer id")?,
        },
        "D" => Event::Dropoff {
            customer_ids: parse_all::<CustomerId>(&payload, "customer id")?,
        },
        "T" => Event::Timeout {
            customer_ids: parse_all::<CustomerId>(&payload, "customer id")?,
        },
        "A" => Event::Arrived {
            vehicle_ids: parse_all::<VehicleId>(&payload, "vehicle id")?,
        },
        "L" => {
            let signed = parse_all::<i128>(&payload, "load delta")?;
            let entries = signed
                .into_iter()
                .enumerate()
                .map(|(i, v)| LoadEntry::from_signed(v, i))
                .collect::<Result<Vec<_>, _>>()?;
            Event::LoadDelta { entries }
        }
        "M" => {
            let (vehicle_id, rest) = split_vehicle(&payload)?;
            let entries = parse_all::<i128>(rest, "customer id")?
                .into_iter()
                .enumerate()
                .map(|(i, v)| MatchEntry::from_signed(v, i))
                .collect::<Result<Vec<_>, _>>()?;
            Event::MatchUpdate {
                vehicle_id,
                entries,
            }
        }
        other => return Err(DecodeError::UnknownTag(other.to_string())),
    };
    Ok(Some(LogEvent::new(tick, event)))
}

/// writes an event back to its dataout wire format.
pub fn encode(event: &LogEvent) -> String {
    event.to_string()
}

fn split_vehicle<'a>(payload: &'a [&'a str]) -> Result<(VehicleId, &'a [&'a str]), DecodeError> {
    let (first, rest) = payload
        .split_first()
        .ok_or(DecodeError::MissingField("vehicle id"))?;
    let vehicle_id = parse_field(Some(*first), "vehicle id")?;
    Ok((vehicle_id, rest))
}

fn parse_field<T>(value: Option<&str>, field: &'static str) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or(DecodeError::MissingField(field))?;
    value.parse::<T>().map_err(|e| DecodeError::InvalidNumber {
        field,
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn parse_all<T>(values: &[&str], field: &'static str) -> Result<Vec<T>, DecodeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    values
        .iter()
        .map(|v| parse_field(Some(*v), field))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_some(line: &str) -> LogEvent {
        decode(line)
            .expect("line should decode")
            .expect("line should carry an event")
    }

    #[test]
    fn test_decode_route() {
        let e = decode_some("5 R 1 10 11 12 13");
        assert_eq!(e.tick, Tick(5));
        assert_eq!(
            e.event,
            Event::RouteAssigned {
                vehicle_id: VehicleId(1),
                nodes: vec![NodeId(10), NodeId(11), NodeId(12), NodeId(13)],
            }
        );
    }

    #[test]
    fn test_decode_vehicle_sample() {
        let e = decode_some("6 V 1 11 2");
        assert_eq!(
            e.event,
            Event::VehicleSample {
                vehicle_id: VehicleId(1),
                current_node: NodeId(11),
                overshoot: 2.0,
            }
        );
    }

    #[test]
    fn test_decode_load_and_match() {
        let load = decode_some("9 L 3 -1");
        assert_eq!(
            load.event,
            Event::LoadDelta {
                entries: vec![LoadEntry::increment(2), LoadEntry::decrement(0)]
            }
        );
        let matches = decode_some("9 M 4 -17 18");
        assert_eq!(
            matches.event,
            Event::MatchUpdate {
                vehicle_id: VehicleId(4),
                entries: vec![
                    MatchEntry::Unmatched(CustomerId(17)),
                    MatchEntry::Matched(CustomerId(18)),
                ],
            }
        );
    }

    #[test]
    fn test_decode_customer_lists() {
        assert_eq!(
            decode_some("2 P 30 31").event,
            Event::Pickup {
                customer_ids: vec![CustomerId(30), CustomerId(31)]
            }
        );
        assert_eq!(
            decode_some("2 T").event,
            Event::Timeout {
                customer_ids: vec![]
            }
        );
        assert_eq!(
            decode_some("2 A 1 2").event,
            Event::Arrived {
                vehicle_ids: vec![VehicleId(1), VehicleId(2)]
            }
        );
    }

    #[test]
    fn test_blank_lines_carry_nothing() {
        assert_eq!(decode(""), Ok(None));
        assert_eq!(decode("   \r\n"), Ok(None));
    }

    #[test]
    fn test_crlf_is_stripped() {
        let e = decode_some("3 P 12\r");
        assert_eq!(
            e.event,
            Event::Pickup {
                customer_ids: vec![CustomerId(12)]
            }
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(decode("5 X 1 2"), Err(DecodeError::UnknownTag("X".into())));
        assert_eq!(decode("5"), Err(DecodeError::MissingField("tag")));
        assert_eq!(decode("5 R 1"), Err(DecodeError::MissingField("route node")));
        assert!(matches!(
            decode("-1 P 3"),
            Err(DecodeError::InvalidNumber { field: "tick", .. })
        ));
        assert!(matches!(
            decode("5 P 3 abc"),
            Err(DecodeError::InvalidNumber {
                field: "customer id",
                ..
            })
        ));
        assert!(matches!(
            decode("5 V 1 11"),
            Err(DecodeError::UnexpectedFieldCount { found: 2, .. })
        ));
        assert!(matches!(
            decode("5 L 2 0"),
            Err(DecodeError::ZeroSignedEntry(1, _))
        ));
        assert_eq!(
            decode("5 M 1 4 -18446744073709551616"),
            Err(DecodeError::SignedEntryOutOfRange(1, "match update"))
        );
    }

    #[test]
    fn test_recognized_fields_are_reproduced() {
        let lines = [
            "5 R 1 10 11 12 13",
            "6 V 1 11 2",
            "6 V 2 9007199254740993 -4",
            "7 P 101 102",
            "7 D 103",
            "8 L 1 -2 3",
            "9 T 104",
            "9 M 2 -101 105",
            "10 A 1",
            "18446744073709551615 P 18446744073709551615",
            "11 L -9223372036854775808",
            "11 M 1 -18446744073709551615 18446744073709551615",
        ];
        for line in lines {
            let e = decode_some(line);
            assert_eq!(encode(&e), line);
        }
    }
}
