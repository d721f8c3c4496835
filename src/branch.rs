use crate::station::Station;

/// The two sides of a line around its anchor, each ascending by sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Branches<'a> {
    pub before: Vec<&'a Station>,
    pub after: Vec<&'a Station>,
}

impl Branches<'_> {
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Stations listing `line` with a sequence on it, ascending by that sequence.
pub fn working_set<'a>(line: &str, stations: &'a [Station]) -> Vec<&'a Station> {
    let mut set: Vec<(i64, &Station)> = stations
        .iter()
        .filter(|station| station.serves(line))
        .filter_map(|station| station.seq_for(line).map(|seq| (seq, station)))
        .collect();
    set.sort_by_key(|(seq, _)| *seq);
    set.into_iter().map(|(_, station)| station).collect()
}

pub fn partition<'a>(line: &str, stations: &'a [Station], anchor: &Station) -> Branches<'a> {
    split_at_anchor(line, &working_set(line, stations), anchor)
}

/// Split an already sorted working set at the anchor's sequence.
pub fn split_at_anchor<'a>(line: &str, ordered: &[&'a Station], anchor: &Station) -> Branches<'a> {
    let Some(pivot) = anchor.seq_for(line) else {
        return Branches {
            before: Vec::new(),
            after: Vec::new(),
        };
    };
    let mut before = Vec::new();
    let mut after = Vec::new();
    for station in ordered {
        let Some(seq) = station.seq_for(line) else {
            continue;
        };
        if seq < pivot {
            before.push(*station);
        } else if seq > pivot {
            after.push(*station);
        }
    }
    Branches { before, after }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn station(id: &str, lines: &[&str], seq: &[(&str, i64)]) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            position: None,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            interchange: false,
            seq: seq
                .iter()
                .map(|(line, idx)| (line.to_string(), *idx))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn ids(stations: &[&Station]) -> Vec<String> {
        stations.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn working_set_requires_membership_and_sequence() {
        let stations = vec![
            station("c", &["X"], &[("X", 30)]),
            station("a", &["X"], &[("X", 10)]),
            station("ghost", &["Y"], &[("X", 15)]),
            station("unordered", &["X"], &[]),
            station("b", &["X", "Y"], &[("X", 20), ("Y", 1)]),
        ];
        assert_eq!(ids(&working_set("X", &stations)), ["a", "b", "c"]);
        assert_eq!(ids(&working_set("Y", &stations)), ["b"]);
        assert!(working_set("Z", &stations).is_empty());
    }

    #[test]
    fn partitions_around_anchor_with_gaps_in_sequence() {
        let stations: Vec<Station> = [2, 9, 4, 40, 17, 25]
            .iter()
            .map(|seq| station(&format!("s{seq}"), &["X"], &[("X", *seq)]))
            .collect();
        let anchor = &stations[4];
        let branches = partition("X", &stations, anchor);
        assert_eq!(ids(&branches.before), ["s2", "s4", "s9"]);
        assert_eq!(ids(&branches.after), ["s25", "s40"]);
        assert_eq!(branches.len() + 1, working_set("X", &stations).len());
    }

    #[test]
    fn terminal_anchor_leaves_one_side_empty() {
        let stations: Vec<Station> = (1..=3)
            .map(|seq| station(&format!("s{seq}"), &["X"], &[("X", seq)]))
            .collect();
        let branches = partition("X", &stations, &stations[0]);
        assert!(branches.before.is_empty());
        assert_eq!(ids(&branches.after), ["s2", "s3"]);
    }

    #[test]
    fn anchor_without_sequence_yields_no_branches() {
        let stations = vec![station("a", &["X"], &[("X", 1)])];
        let stranger = station("z", &["Y"], &[]);
        assert!(partition("X", &stations, &stranger).is_empty());
    }
}
