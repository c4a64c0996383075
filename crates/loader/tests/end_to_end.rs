#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Load fixture documents and run them through the extraction engine.

use std::path::PathBuf;

use apigen_ir::{Document, HttpMethod, Ir, SchemaRef, SemanticType, extract};
use apigen_loader::load_spec;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

async fn extract_fixture(name: &str) -> Ir {
    let value = load_spec(&fixture(name)).await.unwrap();
    let document = Document::from_value(&value).unwrap();
    extract(&document)
}

#[tokio::test]
async fn openapi3_petstore() {
    let ir = extract_fixture("petstore-oas3.yaml").await;

    let ids: Vec<_> = ir.operations.iter().map(|op| op.operation_id.as_str()).collect();
    assert_eq!(ids, ["listPets", "createPet", "listPets2", "deletePets", "searchPets"]);

    let list = ir.operation("listPets").unwrap();
    assert_eq!(list.method, HttpMethod::Get);
    assert_eq!(list.tags, ["pets"]);
    assert!(list.path_params.is_empty());
    assert_eq!(list.query_params.len(), 1);
    assert_eq!(list.query_params[0].name, "limit");
    assert_eq!(list.query_params[0].ty, SemanticType::Number);
    assert_eq!(
        list.response_schema,
        Some(SchemaRef::Array {
            item_ref: Some("Pet".to_string()),
            item_type: None
        })
    );

    let create = ir.operation("createPet").unwrap();
    assert_eq!(create.request_body.as_ref().unwrap().ref_name(), Some("NewPet"));
    assert_eq!(create.response_schema.as_ref().unwrap().ref_name(), Some("Pet"));

    let show = ir.operation("listPets2").unwrap();
    assert_eq!(show.path, "/pets/{petId}");
    assert_eq!(show.path_params[0].name, "petId");
    assert_eq!(show.path_params[0].ty, SemanticType::String);
    assert!(show.path_params[0].required);

    assert!(ir.operation("deletePets").unwrap().response_schema.is_none());

    let names: Vec<_> = ir.schemas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Pet", "NewPet", "Owner", "Error", "SearchPetsBody", "SearchPetsResponse"]
    );

    let pet = ir.schema("Pet").unwrap();
    assert_eq!(pet.required, ["id", "name"]);
    let owner = pet.property("owner").unwrap();
    assert_eq!(owner.ty, SemanticType::Unknown);
    assert_eq!(owner.ref_name.as_deref(), Some("Owner"));
    assert_eq!(pet.property("parent").unwrap().ref_name.as_deref(), Some("Pet"));
    assert_eq!(pet.property("status").unwrap().enum_values.as_ref().map(Vec::len), Some(3));

    let owner_pets = ir.schema("Owner").unwrap().property("pets").unwrap();
    assert!(owner_pets.is_array);
    assert_eq!(owner_pets.item_ref.as_deref(), Some("Pet"));

    let search_body = ir.schema("SearchPetsBody").unwrap();
    let tags = search_body.property("tags").unwrap();
    assert_eq!(tags.ty, SemanticType::Array);
    assert_eq!(tags.item_type, Some(SemanticType::String));
    assert!(search_body.property("query").unwrap().required);

    let search_response = ir.schema("SearchPetsResponse").unwrap();
    assert_eq!(search_response.property("data").unwrap().item_ref.as_deref(), Some("Pet"));
    assert_eq!(search_response.property("total").unwrap().ty, SemanticType::Number);
}

#[tokio::test]
async fn swagger2_petstore() {
    let ir = extract_fixture("petstore-swagger2.yaml").await;

    let ids: Vec<_> = ir.operations.iter().map(|op| op.operation_id.as_str()).collect();
    assert_eq!(ids, ["listPets", "createPet", "postPhoto"]);

    let list = ir.operation("listPets").unwrap();
    assert_eq!(list.query_params[0].name, "limit");
    assert_eq!(list.query_params[0].ty, SemanticType::Number);
    assert_eq!(list.response_schema.as_ref().unwrap().item_ref(), Some("Pet"));

    let create = ir.operation("createPet").unwrap();
    assert_eq!(create.request_body.as_ref().unwrap().ref_name(), Some("NewPet"));

    let upload = ir.operation("postPhoto").unwrap();
    assert_eq!(upload.path_params[0].name, "petId");
    assert!(upload.path_params[0].required);
    assert_eq!(upload.request_body.as_ref().unwrap().ref_name(), Some("PostPhotoBody"));
    assert!(upload.response_schema.is_none());

    let names: Vec<_> = ir.schemas.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Pet", "NewPet", "PostPhotoBody"]);

    let photo = ir.schema("PostPhotoBody").unwrap();
    assert_eq!(photo.required, ["file"]);
    assert_eq!(photo.property("file").unwrap().ty, SemanticType::String);
    assert_eq!(ir.schema("Pet").unwrap().property("tag").unwrap().ty, SemanticType::String);
}

#[tokio::test]
async fn extraction_output_is_stable() {
    let first = serde_json::to_string(&extract_fixture("petstore-oas3.yaml").await).unwrap();
    let second = serde_json::to_string(&extract_fixture("petstore-oas3.yaml").await).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    let op = &value["operations"][0];
    assert_eq!(op["operationId"], "listPets");
    assert_eq!(op["method"], "get");
    assert_eq!(op["queryParams"][0]["type"], "number");
    assert_eq!(op["responseSchema"]["itemRef"], "Pet");
}
