use roster_core::db::open_db_in_memory;
use roster_core::{
    apply_pagination, MemberTeamDto, ModelValidationError, NewMember, NewTeam, Page, PageRequest,
    SelectQuery,
};

#[test]
fn member_team_dto_uses_camel_case_wire_fields() {
    let dto = MemberTeamDto {
        member_id: 7,
        username: Some("member1".to_string()),
        age: 10,
        team_id: None,
        team_name: None,
    };

    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(json["memberId"], 7);
    assert_eq!(json["username"], "member1");
    assert!(json["teamId"].is_null());
    assert!(json["teamName"].is_null());

    let decoded: MemberTeamDto = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, dto);
}

#[test]
fn page_serializes_content_and_metadata() {
    let conn = open_db_in_memory().unwrap();
    let page: Page<i64> = apply_pagination(
        &conn,
        PageRequest::new(0, 5).unwrap(),
        SelectQuery::select_member,
        |row| Ok(row.get("member_id")?),
    )
    .unwrap();

    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["content"], serde_json::json!([]));
    assert_eq!(json["totalCount"], 0);
    assert_eq!(json["limit"], 5);
}

#[test]
fn new_member_builders_set_expected_fields() {
    let member = NewMember::new("member1", 10).in_team(3);
    assert_eq!(member.username.as_deref(), Some("member1"));
    assert_eq!(member.team_id, Some(3));
    assert!(member.validate().is_ok());

    assert_eq!(
        NewMember::unnamed(-4).validate(),
        Err(ModelValidationError::NegativeAge(-4))
    );
    assert_eq!(
        NewTeam::new("").validate(),
        Err(ModelValidationError::BlankTeamName)
    );
}
