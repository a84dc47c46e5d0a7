use crate::gen::GenContext;
use crate::node::{self, details::TypeDetails, Node};
use crate::schema::loader::{self, SourceKind};
use crate::schema::types::TypeRef;
use crate::schema::Schema;
use crate::util::fnv1a;

const FIXTURE: &str = r#"<!-- Version 1193 -->
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:ns="urn:ebay:apis:eBLBaseComponents">
  <xs:element name="AddItemRequest" type="ns:AddItemRequestType"/>
  <xs:element name="AddItemResponse" type="ns:AddItemResponseType"/>
  <xs:complexType name="AddItemRequestType">
    <xs:sequence>
      <xs:element name="Title" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <maxLength>80</maxLength>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="SKU" type="xs:string" minOccurs="0" maxOccurs="unbounded">
        <xs:annotation>
          <xs:appinfo>
            <maxOccurs>3</maxOccurs>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Quantity" type="xs:int" minOccurs="0" maxOccurs="unbounded">
        <xs:annotation>
          <xs:appinfo>
            <max>10</max>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Item" type="ns:ItemType" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="AddItemResponseType">
    <xs:sequence>
      <xs:element name="Ack" type="ns:AckCodeType" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <AllCalls/>
              <Returned>Always</Returned>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="ItemType">
    <xs:sequence>
      <xs:element name="Country" type="ns:CountryCodeType" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Picture" type="xs:string" minOccurs="0" maxOccurs="unbounded">
        <xs:annotation>
          <xs:appinfo>
            <maxLength>100</maxLength>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Description" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Conditionally</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:simpleType name="AckCodeType">
    <xs:restriction base="xs:token">
      <xs:enumeration value="Success"/>
      <xs:enumeration value="Failure"/>
      <xs:enumeration value="CustomCode"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:simpleType name="CountryCodeType">
    <xs:restriction base="xs:token">
      <xs:enumeration value="US"/>
      <xs:enumeration value="DE"/>
      <xs:enumeration value="CustomCode"/>
    </xs:restriction>
  </xs:simpleType>
</xs:schema>"#;

fn fixture() -> Schema {
    loader::load(FIXTURE, SourceKind::Xsd).unwrap()
}

fn generated() -> (Schema, String) {
    let schema = fixture();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();
    let validator = ctx.validators.get("AddItem").cloned().unwrap_or_default();
    drop(ctx);
    (schema, validator)
}

#[test]
fn resolver_prefers_complex_over_simple() {
    let schema = fixture();
    assert!(matches!(
        node::find(&schema, "ItemType").unwrap(),
        Node::Complex(_)
    ));
    assert!(matches!(
        node::find(&schema, "AckCodeType").unwrap(),
        Node::Simple(_)
    ));
    assert!(node::find(&schema, "NoSuchType").is_err());
}

#[test]
fn element_type_details() {
    let schema = fixture();
    let seq = schema
        .find_complex("AddItemRequestType")
        .unwrap()
        .sequence
        .as_ref()
        .unwrap();

    // Title: nullable string, no pointer, no slice.
    let title = super::element::type_details(&seq.elements[0], &schema).unwrap();
    assert!(!title.is_pointer);
    assert!(!title.is_slice);
    assert!(!title.simple_type);

    // SKU: repeated.
    let sku = super::element::type_details(&seq.elements[1], &schema).unwrap();
    assert!(sku.is_slice);
    assert!(!sku.is_pointer);

    // Item: named complex, neither nullable nor repeated, so a pointer.
    let item = super::element::type_details(&seq.elements[3], &schema).unwrap();
    assert!(item.is_pointer);
    assert!(!item.is_slice);

    // Country (inside ItemType): alias of a textual primitive.
    let item_seq = schema
        .find_complex("ItemType")
        .unwrap()
        .sequence
        .as_ref()
        .unwrap();
    let country = super::element::type_details(&item_seq.elements[0], &schema).unwrap();
    assert!(country.simple_type);
    assert!(!country.is_pointer);
    assert_eq!(country.alias_for, TypeRef::from("xs:token"));
}

#[test]
fn declaration_lines() {
    let schema = fixture();
    let seq = schema
        .find_complex("AddItemRequestType")
        .unwrap()
        .sequence
        .as_ref()
        .unwrap();

    assert_eq!(
        Node::Element(&seq.elements[0]).decl_line(&schema).unwrap(),
        "Title NullString `xml:\"Title,omitempty\" json:\"title,omitempty\"`"
    );
    // Repeated NullString gets the list wrapper.
    assert_eq!(
        Node::Element(&seq.elements[1]).decl_line(&schema).unwrap(),
        "SKU NullStringList `xml:\"SKU,omitempty\" json:\"sku,omitempty\"`"
    );
    assert_eq!(
        Node::Element(&seq.elements[3]).decl_line(&schema).unwrap(),
        "Item *ItemType `xml:\"Item,omitempty\" json:\"item,omitempty\"`"
    );
}

#[test]
fn request_root_gets_xml_name_preamble() {
    let schema = fixture();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();

    let root = &ctx.types["AddItemRequestType"];
    assert!(root.contains("XMLName\txml.Name `xml:\"AddItemRequest\" json:\"-\"`"));
    assert!(root.contains("XmlnsAttr `xml:\"xmlns,attr\" json:\"-\"`"));

    // Referenced types carry no wire-envelope preamble.
    assert!(!ctx.types["ItemType"].contains("XMLName"));
    assert!(!ctx.types["AddItemResponseType"].contains("XMLName"));
}

#[test]
fn generation_is_idempotent() {
    let schema = fixture();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();
    let types_before = ctx.types.len();
    let body_before = ctx.types["ItemType"].clone();

    let item = node::find(&schema, "ItemType").unwrap();
    item.generate(&mut ctx).unwrap();
    assert_eq!(ctx.types.len(), types_before);
    assert_eq!(ctx.types["ItemType"], body_before);
}

#[test]
fn enum_generation_skips_the_custom_code_sentinel() {
    let schema = fixture();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();

    let decl = &ctx.enums["AckCodeType"];
    assert!(decl.starts_with("type AckCodeType string\r\n"));
    assert!(decl.contains("\tAck_Success AckCodeType = \"Success\"\r\n"));
    assert!(decl.contains("\tAck_Failure = \"Failure\"\r\n"));
    assert!(!decl.contains("CustomCode"));

    assert_eq!(
        ctx.funcs["AckCodeTypeList"],
        "var AckCodeTypeList = [...]string{\"Success\",\"Failure\"}"
    );
    assert!(ctx.funcs["AckCodeTypeHelper"].contains("func (x *AckCodeType) Set(value string) error"));
    assert!(ctx.funcs["AckCodeTypeHelper"]
        .contains("errors.New(\"invalid value for AckCodeType\")"));
    assert!(ctx.funcs["AckCodeType"].contains("func (x AckCodeType) String() string"));
}

#[test]
fn accessors_for_repeated_request_fields_and_ack_predicates() {
    let schema = fixture();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();

    let append = &ctx.funcs["AddItemRequestType_AppendSKU"];
    assert!(append.contains("func (x *AddItemRequestType) AppendSKU(v ...string)"));
    assert!(append.contains("x.SKU.Append(v...)"));

    let acks = &ctx.funcs["AddItemResponseType_AckCodeTypeAck"];
    assert!(acks.contains("func (x AddItemResponseType) Success() bool"));
    assert!(acks.contains("return x.Ack == Ack_Success"));
    assert!(acks.contains("func (x AddItemResponseType) Failure() bool"));
    assert!(!acks.contains("CustomCode"));
}

#[test]
fn validator_renders_required_and_bound_checks() {
    let (_schema, v) = generated();

    assert!(v.contains("if !x.Title.Valid { return errors.New(\"field Title must be set\") }"));
    assert!(v.contains(
        "if len(x.Title.NullString.String) > 80 { return errors.New(\"field x.Title must be between 1 and 80 characters long\") }"
    ));
    assert!(v.contains("if len(x.SKU) > 3 { return errors.New(\"field x.SKU must be between 0 and 3\") }"));
    assert!(v.contains("if len(x.SKU) == 0 { return errors.New(\"field SKU must be set\") }"));
    // The optional Description never shows up.
    assert!(!v.contains("Description"));
}

#[test]
fn max_occurs_check_precedes_the_required_guard() {
    let (_schema, v) = generated();
    let occurs = v.find("len(x.SKU) > 3").unwrap();
    let required = v.find("len(x.SKU) == 0").unwrap();
    assert!(occurs < required);
}

#[test]
fn repeated_field_with_value_rules_gets_a_loop() {
    let (_schema, v) = generated();
    let key = format!("i{}", fnv1a("x"));
    assert!(v.contains(&format!("for {} := range x.Quantity {{", key)));
    assert!(v.contains(&format!(
        "if x.Quantity[{0}].Value() > 10 {{ return errors.New(\"field x.Quantity must be at most 10\") }}",
        key
    )));
    // SKU carries no per-item rules and no deep requirement, so no loop.
    assert!(!v.contains("range x.SKU"));
}

#[test]
fn loop_keys_differ_across_nesting_levels() {
    let (_schema, v) = generated();
    let outer = format!("i{}", fnv1a("x"));
    let inner = format!("i{}", fnv1a("x.Item"));
    assert_ne!(outer, inner);
    assert!(v.contains(&format!("for {} := range x.Item.Picture {{", inner)));
    assert!(v.contains(&format!(
        "len(x.Item.Picture[{}].NullString.String) > 100",
        inner
    )));
}

#[test]
fn pointer_guard_encloses_nested_validation() {
    let (_schema, v) = generated();

    let item_required = v.find("if x.Item == nil").unwrap();
    let guard = v.find("if x.Item != nil {").unwrap();
    let nested = v
        .find("if x.Item.Country == \"\" { return errors.New(\"field Country must be set\") }")
        .unwrap();
    assert!(item_required < guard);
    assert!(guard < nested);

    // The guard closes after the nested checks.
    let close = v.rfind("}\r\n").unwrap();
    assert!(nested < close);
}

#[test]
fn deep_validation_sees_descendant_requirements() {
    let schema = fixture();
    let ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);

    let item = node::find(&schema, "ItemType").unwrap();
    assert!(item.deep_requires_validation(&ctx, "AddItem", "x.Item").unwrap());
    assert!(!item.deep_requires_validation(&ctx, "GetOrders", "x.Item").unwrap());
}

#[test]
fn details_path_rendering() {
    // The coercion keys off the substituted type, so a token alias renders
    // without it.
    let mut token_alias = TypeDetails::new("Country", TypeRef::from("ns:CountryCodeType"));
    token_alias.alias_for = TypeRef::from("xs:token");
    assert_eq!(token_alias.path("x.Item").unwrap(), "x.Item.Country");

    let mut textual = TypeDetails::new("Region", TypeRef::from("ns:RegionCodeType"));
    textual.alias_for = TypeRef::from("string");
    assert_eq!(textual.path("x").unwrap(), "x.Region.String()");

    let plain = TypeDetails::new("Title", TypeRef::from("xs:string"));
    assert_eq!(plain.path("x").unwrap(), "x.Title");

    let keyed = TypeDetails::new("SKU", TypeRef::from("xs:string")).with_key("i42");
    assert_eq!(keyed.path("x").unwrap(), "x.SKU[i42]");
}

#[test]
fn is_set_rendering_per_category() {
    let schema = fixture();

    let mut pointer = TypeDetails::new("Item", TypeRef::from("ns:ItemType"));
    pointer.is_pointer = true;
    assert_eq!(pointer.is_set("x.Item").unwrap(), "x.Item == nil");

    let mut slice = TypeDetails::new("SKU", TypeRef::from("xs:string"));
    slice.is_slice = true;
    assert_eq!(slice.is_set("x.SKU").unwrap(), "len(x.SKU) == 0");

    let null = TypeDetails::new("Title", TypeRef::from("xs:string"));
    assert_eq!(null.is_set("x.Title").unwrap(), "!x.Title.Valid");

    let mut alias = TypeDetails::new("Country", TypeRef::from("ns:CountryCodeType"));
    alias.simple_type = true;
    alias.alias_for = schema
        .find_simple("CountryCodeType")
        .unwrap()
        .restriction
        .base
        .clone();
    assert_eq!(alias.is_set("x.Country").unwrap(), "x.Country == \"\"");

    // No rendering for a bare named struct.
    let unknown = TypeDetails::new("Item", TypeRef::from("ns:ItemType"));
    assert!(unknown.is_set("x.Item").is_err());
}

#[test]
fn self_referential_type_terminates() {
    let xsd = r#"<!-- Version 1193 -->
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:ns="urn:ebay:apis:eBLBaseComponents">
  <xs:element name="AddItemRequest" type="ns:AddItemRequestType"/>
  <xs:element name="AddItemResponse" type="ns:AddItemResponseType"/>
  <xs:complexType name="AddItemRequestType">
    <xs:sequence>
      <xs:element name="Variation" type="ns:VariationType" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="AddItemResponseType">
    <xs:sequence/>
  </xs:complexType>
  <xs:complexType name="VariationType">
    <xs:sequence>
      <xs:element name="Variation" type="ns:VariationType" minOccurs="0"/>
      <xs:element name="SKU" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#;
    let schema = loader::load(xsd, SourceKind::Xsd).unwrap();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();

    let v = &ctx.validators["AddItem"];
    assert!(v.contains("if !x.Variation.SKU.Valid"));
    // The self-typed member is skipped rather than recursed into.
    assert!(!v.contains("Variation.Variation"));
}

#[test]
fn inherited_fields_filter_by_call() {
    let xsd = r#"<!-- Version 1193 -->
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:ns="urn:ebay:apis:eBLBaseComponents">
  <xs:element name="AddItemRequest" type="ns:AddItemRequestType"/>
  <xs:element name="AddItemResponse" type="ns:AddItemResponseType"/>
  <xs:complexType name="AbstractRequestType" abstract="true">
    <xs:sequence>
      <xs:element name="MessageID" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <AllCalls/>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Version" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>ReviseItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="AddItemRequestType">
    <xs:complexContent>
      <xs:extension base="ns:AbstractRequestType">
        <xs:sequence>
          <xs:element name="Title" type="xs:string" minOccurs="0">
            <xs:annotation>
              <xs:appinfo>
                <CallInfo>
                  <CallName>AddItem</CallName>
                  <RequiredInput>Yes</RequiredInput>
                </CallInfo>
              </xs:appinfo>
            </xs:annotation>
          </xs:element>
        </xs:sequence>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:complexType name="AddItemResponseType">
    <xs:sequence/>
  </xs:complexType>
</xs:schema>"#;
    let schema = loader::load(xsd, SourceKind::Xsd).unwrap();
    let mut ctx = GenContext::new(&schema, vec!["AddItem".to_string()]);
    ctx.run().unwrap();

    let decl = &ctx.types["AddItemRequestType"];
    // Inherited fields come first; the clause scoped to another call drops out.
    assert!(decl.contains("MessageID NullString"));
    assert!(!decl.contains("Version"));
    let message = decl.find("MessageID").unwrap();
    let title = decl.find("Title NullString").unwrap();
    assert!(message < title);

    // The derived sequence guards the inherited field and nothing for the
    // one scoped to the other call.
    let v = &ctx.validators["AddItem"];
    assert!(v.contains("if !x.MessageID.Valid { return errors.New(\"field MessageID must be set\") }"));
    assert!(v.contains("if !x.Title.Valid"));
    assert!(!v.contains("Version"));
    assert!(v.find("MessageID").unwrap() < v.find("Title").unwrap());
}
