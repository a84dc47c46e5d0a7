use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xsd_to_go::gen::writer::assemble;
use xsd_to_go::gen::{exported_calls, GenContext};
use xsd_to_go::schema::loader::{load, SourceKind};

const SAMPLE_XSD: &str = r#"<!-- Version 1193 -->
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:ns="urn:ebay:apis:eBLBaseComponents"
           targetNamespace="urn:ebay:apis:eBLBaseComponents">
  <xs:element name="AddItemRequest" type="ns:AddItemRequestType"/>
  <xs:element name="AddItemResponse" type="ns:AddItemResponseType"/>
  <xs:complexType name="AddItemRequestType">
    <xs:sequence>
      <xs:element name="Title" type="xs:string" minOccurs="0">
        <xs:annotation>
          <xs:appinfo>
            <CallInfo>
              <CallName>AddItem</CallName>
              <RequiredInput>Yes</RequiredInput>
            </CallInfo>
            <MaxLength>80</MaxLength>
          </xs:appinfo>
        </xs:annotation>
      </xs:element>
      <xs:element name="Country" type="ns:CountryCodeType" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="AddItemResponseType">
    <xs:sequence>
      <xs:element name="Ack" type="ns:AckCodeType" minOccurs="0"/>
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
</xs:schema>
"#;

fn benchmark_load_schema(c: &mut Criterion) {
    c.bench_function("load_schema", |b| {
        b.iter(|| load(black_box(SAMPLE_XSD), SourceKind::Xsd))
    });
}

fn benchmark_generate_source(c: &mut Criterion) {
    let schema = load(SAMPLE_XSD, SourceKind::Xsd).unwrap();
    let version = schema.version.clone().unwrap();

    c.bench_function("generate_source", |b| {
        b.iter(|| {
            let exported = exported_calls(&schema, None);
            let mut ctx = GenContext::new(black_box(&schema), exported);
            ctx.run().unwrap();
            assemble(&ctx, &version)
        })
    });
}

criterion_group!(benches, benchmark_load_schema, benchmark_generate_source);
criterion_main!(benches);
