use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest::new(1, 20).offset(), 0);
    assert_eq!(PageRequest::new(2, 20).offset(), 20);
    assert_eq!(PageRequest::new(5, 10).offset(), 40);
}

#[test]
fn test_page_request_clamps() {
    let request = PageRequest::new(0, 1000);
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, MAX_PER_PAGE);

    let request = PageRequest::new(3, 0);
    assert_eq!(request.per_page, 1);
}

#[test]
fn test_page_request_limit() {
    assert_eq!(PageRequest::new(1, 50).limit(), 50);
}

#[test]
fn test_page_response_total_pages() {
    let response = PageResponse::new(vec![1, 2, 3], 1, 10, 3);
    assert_eq!(response.data, vec![1, 2, 3]);
    assert_eq!(response.meta.total_pages, 1);

    let response = PageResponse::new(Vec::<i32>::new(), 1, 10, 0);
    assert_eq!(response.meta.total_pages, 1);

    let response = PageResponse::new(vec![1], 3, 10, 21);
    assert_eq!(response.meta.total_pages, 3);
}
