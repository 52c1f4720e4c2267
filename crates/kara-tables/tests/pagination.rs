//! Integration tests for pagination.

use std::fmt;

use kara_macros::Record;
use kara_query::MemoryCollection;
use kara_tables::{PageLink, Pagination, QueryParams, TableError, TableSettings};

#[derive(Debug, Record)]
struct Member {
    #[field(Numeric)]
    id: u32,
    #[field(ShortText)]
    username: String,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

fn members(n: u32) -> Vec<Member> {
    (1..=n)
        .map(|id| Member {
            id,
            username: id.to_string(),
        })
        .collect()
}

fn paginate<'a>(
    members: &'a [Member],
    per_page: usize,
    query: &str,
) -> Pagination<MemoryCollection<'a, Member>> {
    Pagination::new(
        MemoryCollection::new(members),
        &QueryParams::parse(query),
        &TableSettings::default(),
        per_page,
    )
}

fn usernames(pagination: &Pagination<MemoryCollection<'_, Member>>) -> Vec<String> {
    pagination
        .get_objects()
        .unwrap()
        .iter()
        .map(|m| m.username.clone())
        .collect()
}

#[test]
fn test_pagination() {
    let members = members(100);
    let pagination = paginate(&members, 5, "");
    assert_eq!(pagination.result_count(), 100);
    assert!(pagination.multi_page());
    assert_eq!(pagination.num_pages(), 20);

    let pagination = paginate(&members, 200, "");
    assert!(!pagination.multi_page());
    assert_eq!(pagination.num_pages(), 1);
}

#[test]
fn test_single_page_returns_everything() {
    let members = members(8);
    for query in ["", "page=1", "page=7", "page=-2", "page=abc"] {
        let pagination = paginate(&members, 10, query);
        assert!(!pagination.multi_page());
        assert_eq!(usernames(&pagination).len(), 8, "query {query:?}");
    }
}

#[test]
fn test_exact_fit_is_single_page() {
    let members = members(10);
    let pagination = paginate(&members, 10, "page=2");
    assert!(!pagination.multi_page());
    assert_eq!(pagination.page_range().collect::<Vec<_>>(), vec![PageLink::Number(1)]);
}

#[test]
fn test_windowing() {
    let members = members(100);
    let pagination = paginate(&members, 10, "page=5");
    let expected: Vec<String> = (41..=50).map(|i| i.to_string()).collect();
    assert_eq!(usernames(&pagination), expected);
}

#[test]
fn test_pagination_result_objects() {
    let members = members(100);
    let cases: [(usize, usize, Vec<u32>); 6] = [
        (2, 25, vec![49, 50]),
        (4, 12, vec![45, 46, 47, 48]),
        (5, 10, (46..=50).collect()),
        (7, 11, (71..=77).collect()),
        (10, 10, (91..=100).collect()),
        (200, 1, (1..=100).collect()),
    ];
    for (per_page, page, expected) in cases {
        let pagination = paginate(&members, per_page, &format!("page={page}"));
        let expected: Vec<String> = expected.iter().map(|i| i.to_string()).collect();
        assert_eq!(usernames(&pagination), expected, "{per_page} per page, page {page}");
    }
}

#[test]
fn test_pagination_page_range() {
    let members = members(100);
    let cases: [(usize, usize, &[&str]); 6] = [
        (2, 6, &["1", "2", "3", "4", "5", "6", "7", "8", "9", "…", "49", "50"]),
        (
            3,
            10,
            &["1", "2", "…", "7", "8", "9", "10", "11", "12", "13", "…", "33", "34"],
        ),
        (4, 23, &["1", "2", "…", "20", "21", "22", "23", "24", "25"]),
        (5, 20, &["1", "2", "…", "17", "18", "19", "20"]),
        (10, 8, &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]),
        (20, 1, &["1", "2", "3", "4", "5"]),
    ];
    for (per_page, page, expected) in cases {
        let pagination = paginate(&members, per_page, &format!("page={page}"));
        let range: Vec<String> = pagination.page_range().map(|l| l.to_string()).collect();
        assert_eq!(range, expected, "{per_page} per page, page {page}");
    }
}

#[test]
fn test_invalid_page_raises() {
    let members = members(30);
    let pagination = paginate(&members, 10, "page=999");
    let err = pagination.get_objects().unwrap_err();
    assert!(matches!(
        err,
        TableError::InvalidPage {
            page: 999,
            num_pages: 3
        }
    ));
    assert!(err.is_not_found());

    assert!(paginate(&members, 10, "page=0").get_objects().is_err());
    assert!(paginate(&members, 10, "page=-1").get_objects().is_err());
}

#[test]
fn test_malformed_page_defaults_to_first() {
    let members = members(30);
    let pagination = paginate(&members, 10, "page=abc");
    assert_eq!(pagination.page_num(), 1);
    assert_eq!(usernames(&pagination).first().map(String::as_str), Some("1"));
}

#[test]
fn test_neighbours_and_links() {
    let members = members(30);
    let pagination = paginate(&members, 10, "search=x&page=2");
    assert!(pagination.has_previous());
    assert!(pagination.has_next());
    assert_eq!(pagination.previous_page_number(), Some(1));
    assert_eq!(pagination.next_page_number(), Some(3));
    assert_eq!(pagination.page_link(3), "?search=x&page=3");

    let last = paginate(&members, 10, "page=3");
    assert!(!last.has_next());
    assert_eq!(last.next_page_number(), None);

    let beyond = paginate(&members, 10, "page=4");
    assert!(!beyond.has_previous());
    assert!(!beyond.has_next());
}

#[test]
fn test_custom_page_var() {
    let members = members(30);
    let settings = TableSettings {
        page_var: "p".into(),
        ..TableSettings::default()
    };
    let pagination = Pagination::new(
        MemoryCollection::new(&members),
        &QueryParams::parse("p=3&page=1"),
        &settings,
        10,
    );
    assert_eq!(pagination.page_num(), 3);
    assert_eq!(pagination.page_link(1), "?page=1&p=1");
}

#[test]
fn test_summary_serializes() {
    let members = members(30);
    let summary = paginate(&members, 10, "page=2").summary();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["num_pages"], 3);
    assert_eq!(json["previous"], "?page=1");
    assert_eq!(json["next"], "?page=3");
    assert_eq!(json["pages"][1]["link"], 2);
    assert_eq!(json["pages"][1]["current"], true);
    assert_eq!(json["pages"][0]["current"], false);
}
