/// Partition fragments into ordered groups bounded by total characters and item count.
///
/// `separator_len` is the cost of joining two neighbours. A fragment longer than
/// `max_chars` is never split; it becomes a group of its own.
pub fn chunk<I>(fragments: I, max_chars: usize, max_items: usize, separator_len: usize) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let max_items = max_items.max(1);

    let mut groups = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;

    for fragment in fragments {
        let len = fragment.chars().count();
        let separator = if current.is_empty() { 0 } else { separator_len };
        let projected = current_len + separator + len;

        if !current.is_empty() && (projected > max_chars || current.len() >= max_items) {
            groups.push(std::mem::take(&mut current));
            current_len = len;
        } else {
            current_len = projected;
        }

        current.push(fragment);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(count: usize, len: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let c = char::from(b'a' + (i % 26) as u8);
                c.to_string().repeat(len)
            })
            .collect()
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(chunk(Vec::new(), 100, 10, 3).is_empty());
    }

    #[test]
    fn exact_char_budget_fits() {
        let groups = chunk(fragments(120, 50), 500, 50, 0);
        assert_eq!(groups.len(), 12);
        assert!(groups.iter().all(|g| g.len() == 10));
    }

    #[test]
    fn one_char_over_budget_closes_group() {
        let groups = chunk(fragments(3, 50), 99, 50, 0);
        assert_eq!(groups.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 1, 1]);
    }

    #[test]
    fn item_limit_is_inclusive() {
        let groups = chunk(fragments(7, 1), 1000, 3, 0);
        assert_eq!(groups.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);
    }

    #[test]
    fn separator_counts_between_items() {
        // 10 + 5 + 10 = 25 fits, a third item would need 40
        let groups = chunk(fragments(3, 10), 25, 50, 5);
        assert_eq!(groups.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn oversized_fragment_stands_alone() {
        let input = vec!["short".to_string(), "x".repeat(900), "tail".to_string()];
        let groups = chunk(input.clone(), 500, 50, 0);
        assert_eq!(groups, vec![vec![input[0].clone()], vec![input[1].clone()], vec![input[2].clone()]]);
    }

    #[test]
    fn oversized_first_fragment_is_kept() {
        let groups = chunk(vec!["y".repeat(600)], 500, 50, 9);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0][0].len(), 600);
    }

    #[test]
    fn lengths_count_chars_not_bytes() {
        let input = vec!["日本語".to_string(), "テキスト".to_string()];
        let groups = chunk(input, 7, 10, 0);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn zero_item_limit_still_progresses() {
        let groups = chunk(fragments(3, 1), 100, 0, 0);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn groups_partition_the_input() {
        let lengths = [0usize, 1, 7, 49, 50, 51, 120, 3, 3, 3, 499, 500, 501, 2, 90];
        let input: Vec<String> = lengths.iter().map(|n| "w".repeat(*n)).collect();

        for max_chars in [1, 10, 50, 100, 500, 1000] {
            for max_items in [1, 2, 5, 50] {
                for separator_len in [0, 1, 9] {
                    let groups = chunk(input.clone(), max_chars, max_items, separator_len);
                    let flattened: Vec<String> = groups.iter().flatten().cloned().collect();
                    assert_eq!(flattened, input);

                    for group in &groups {
                        assert!(!group.is_empty());
                        assert!(group.len() <= max_items);
                        let joined: usize = group.iter().map(|f| f.chars().count()).sum::<usize>()
                            + separator_len * (group.len() - 1);
                        assert!(joined <= max_chars || group.len() == 1);
                    }
                }
            }
        }
    }
}
