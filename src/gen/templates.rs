//! Literal Go text the writer assembles around the generated declarations:
//! the package header with its gateway plumbing, the Null wrapper types, and
//! the per-call requester / marshaler / validator shells.

const HEADER_PRE: &str = r#"package ebaysvc

import (
	"encoding/json"
	"bytes"
	"database/sql"
	"encoding/xml"
	"errors"
	"net/http"
	"strconv"
	"io"
	"strings"
)

var (
	APIGateway string

	// X-EBAY-API-COMPATIBILITY-LEVEL
	// Required: Always.
	APICompatibilityLevel string = ""#;

const HEADER_POST: &str = r#""

	// X-EBAY-API-DEV-NAME
	// Required: Conditionally, for the token management calls only.
	APIDevName string

	// X-EBAY-API-APP-NAME
	// Required: Conditionally, for the token management calls only.
	APIAppName string

	// X-EBAY-API-CERT-NAME
	// Required: Conditionally, for the token management calls only.
	APICertName string

	ErrAPIAppNameNotSet  error = errors.New("APIAppName is not set")
	ErrAPIDevNameNotSet  error = errors.New("APIDevName is not set")
	ErrAPICertNameNotSet error = errors.New("APICertName is not set")
	ErrAPISiteIDNotSet   error = errors.New("APISiteID is not set")
	ErrAPIGatewayNotSet  error = errors.New("APIGateway is not set")

	RequestValidation bool
)

type xbayRequester struct {
	callName string
	siteID   string
	body     *bytes.Buffer
	response interface{}
}

func newRequester(callname, siteID string, response interface{}) *xbayRequester {
	return &xbayRequester{
		callName: callname,
		siteID:   siteID,
		body:     bytes.NewBufferString(xml.Header),
		response: response,
	}
}

func (x *xbayRequester) request() error {
	if x.siteID == "" {
		return ErrAPISiteIDNotSet
	}
	if APIGateway == "" {
		return ErrAPIGatewayNotSet
	}
	client := &http.Client{}
	request, err := http.NewRequest("POST", APIGateway, x.body)
	if err != nil {
		return err
	}

	switch x.callName {
	case "GetSessionID", "FetchToken", "GetTokenStatus", "RevokeToken":
		if APIDevName == "" {
			return ErrAPIDevNameNotSet
		}
		if APIAppName == "" {
			return ErrAPIAppNameNotSet
		}
		if APICertName == "" {
			return ErrAPICertNameNotSet
		}
		request.Header.Add("X-EBAY-API-DEV-NAME", APIDevName)
		request.Header.Add("X-EBAY-API-APP-NAME", APIAppName)
		request.Header.Add("X-EBAY-API-CERT-NAME", APICertName)
	}
	request.Header.Add("X-EBAY-API-COMPATIBILITY-LEVEL", APICompatibilityLevel)
	request.Header.Add("X-EBAY-API-SITEID", x.siteID)
	request.Header.Add("X-EBAY-API-CALL-NAME", x.callName)

	response, err := client.Do(request)
	if err != nil {
		return err
	}
	return xml.NewDecoder(response.Body).Decode(x.response)
}

func contains(s []string, e string) bool {
	for _, a := range s {
		if a == e {
			return true
		}
	}
	return false
}

type XmlnsAttr byte

func (m XmlnsAttr) MarshalXMLAttr(name xml.Name) (xml.Attr, error) {
	return xml.Attr{name, "urn:ebay:apis:eBLBaseComponents"}, nil
}
"#;

/// The fixed package preamble with the schema version baked into the
/// compatibility-level header.
pub fn package_header(version: &str) -> String {
    format!("{}{}{}", HEADER_PRE, version, HEADER_POST)
}

/// Null wrapper types over `database/sql` with XML/JSON/text codec methods
/// and list variants for repeated fields.
pub const NULL_TYPES: &str = r#"
type NullInt64 struct {
	sql.NullInt64
}

type NullInt64List []NullInt64

func (l *NullInt64List) Append(value ...int64) *NullInt64List {
	for _, v := range value {
		n := NullInt64{}
		n.Set(v)
		*l = append(*l, n)
	}
	return l
}

func (n *NullInt64) Set(value int64) {
	n.Int64 = value
	n.Valid = true
}

func (n NullInt64) Value() int64 {
	return n.Int64
}

func (n NullInt64) String() string {
	if !n.Valid {
		return ""
	}
	return strconv.FormatInt(n.Int64, 10)
}

func (n NullInt64) MarshalXML(e *xml.Encoder, start xml.StartElement) (err error) {
	if !n.Valid {
		return
	}
	return e.EncodeElement(n.Int64, start)
}

func (n NullInt64) MarshalJSON() (value []byte, e error) {
	if !n.Valid {
		return []byte("null"), nil
	}

	return strconv.AppendInt(value, n.Int64, 10), nil
}

func (n NullInt64) MarshalText() (value []byte, err error) {
	if !n.Valid {
		return nil, nil
	}

	return strconv.AppendInt(value, n.Int64, 10), nil
}

func (n *NullInt64) UnmarshalText(text []byte) (err error) {
	if text == nil {
		n.Valid = false
		return
	}

	if n.Int64, err = strconv.ParseInt(string(text), 10, 64); err != nil {
		n.Int64 = 0
		n.Valid = false
		return
	}
	n.Valid = true
	return
}

type NullStringList []NullString

func (l *NullStringList) Append(value ...string) *NullStringList {
	for _, v := range value {
		n := NullString{}
		n.Set(v)
		*l = append(*l, n)
	}
	return l
}

type NullString struct {
	sql.NullString
}

func (n *NullString) Set(value string) {
	n.NullString.String = value
	n.Valid = true
}

func (n NullString) Value() string {
	return n.NullString.String
}

func (n NullString) String() string {
	if !n.Valid {
		return ""
	}
	return n.NullString.String
}

func (n NullString) MarshalXML(e *xml.Encoder, start xml.StartElement) (err error) {
	if !n.Valid {
		return
	}
	return e.EncodeElement(n.NullString.String, start)
}

func (n NullString) MarshalJSON() ([]byte, error) {
	if !n.Valid {
		return []byte("null"), nil
	}

	return json.Marshal(n.NullString.String)
}

func (n NullString) MarshalText() ([]byte, error) {
	if !n.Valid {
		return nil, nil
	}
	return []byte(n.NullString.String), nil
}

func (n *NullString) UnmarshalText(text []byte) (err error) {
	if text == nil {
		n.Valid = false
		return
	}
	n.NullString.String = string(text)
	n.Valid = true
	return
}

type NullFloat64 struct {
	sql.NullFloat64
}

type NullFloat64List []NullFloat64

func (l *NullFloat64List) Append(value ...float64) *NullFloat64List {
	for _, v := range value {
		n := NullFloat64{}
		n.Set(v)
		*l = append(*l, n)
	}
	return l
}

func (n *NullFloat64) Set(value float64) {
	n.Float64 = value
	n.Valid = true
}

func (n NullFloat64) Value() float64 {
	return n.Float64
}

func (n NullFloat64) String() string {
	if !n.Valid {
		return ""
	}
	return strconv.FormatFloat(n.Float64, 'f', -1, 64)
}

func (n NullFloat64) MarshalXML(e *xml.Encoder, start xml.StartElement) (err error) {
	if !n.Valid {
		return
	}
	return e.EncodeElement(n.Float64, start)
}

func (n NullFloat64) MarshalJSON() (value []byte, e error) {
	if !n.Valid {
		return []byte("null"), nil
	}

	return strconv.AppendFloat(value, n.Float64, 'f', -1, 64), nil
}

func (n NullFloat64) MarshalText() (value []byte, err error) {
	if !n.Valid {
		return
	}
	return strconv.AppendFloat(value, n.Float64, 'f', -1, 64), nil
}

func (n *NullFloat64) UnmarshalText(text []byte) (err error) {
	if text == nil {
		n.Valid = false
		return
	}
	if n.Float64, err = strconv.ParseFloat(string(text), 64); err != nil {
		n.Float64 = 0
		n.Valid = false
		return
	}
	n.Valid = true
	return
}

type NullBool struct {
	sql.NullBool
}

func (n *NullBool) Set(value bool) {
	n.Bool = value
	n.Valid = true
}

func (n NullBool) Value() bool {
	return n.Bool
}

func (n NullBool) String() string {
	if !n.Valid {
		return ""
	}
	if n.Bool {
		return "true"
	}
	return "false"
}

func (n NullBool) MarshalXML(e *xml.Encoder, start xml.StartElement) (err error) {
	if !n.Valid {
		return
	}
	return e.EncodeElement(n.Bool, start)
}

func (n NullBool) MarshalJSON() (value []byte, e error) {
	if !n.Valid {
		return []byte("null"), nil
	}

	return strconv.AppendBool(value, n.Bool), nil
}

func (n NullBool) MarshalText() (value []byte, err error) {
	if !n.Valid {
		return
	}
	return strconv.AppendBool(value, n.Bool), nil
}

func (n *NullBool) UnmarshalText(text []byte) (err error) {
	if text == nil {
		n.Valid = false
		return
	}
	switch strings.ToLower(string(text)) {
	case "false":
		n.Bool = false
	case "true":
		n.Bool = true
	default:
		n.Bool = false
		return
	}
	n.Valid = true
	return
}
"#;

/// The `Request` method on the call's request type: credentials injection,
/// optional validation, encode, send, decode.
pub fn requester(call: &str) -> String {
    format!(
        r#"func (x *{0}RequestType) Request(eBayAuthToken, siteID string) (response {0}ResponseType, err error) {{
	if x.RequesterCredentials == nil {{
		x.RequesterCredentials = &XMLRequesterCredentialsType{{}}
	}}
	x.RequesterCredentials.EBayAuthToken.Set(eBayAuthToken)

	if RequestValidation {{
		if err = x.Validate(); err != nil {{
			return
		}}
	}}

	req := newRequester("{0}", siteID, &response)
	if err = xml.NewEncoder(req.body).Encode(x); err != nil {{
		return
	}}

	if err = req.request(); err != nil {{
		return
	}}

	return
}}
"#,
        call
    )
}

pub fn xml_encoder(call: &str) -> String {
    format!(
        r#"func (x {0}RequestType) MarshalXMLEncode(w io.Writer) error {{
	if RequestValidation {{
		if err := x.Validate(); err != nil {{
			return err
		}}
	}}
	return xml.NewEncoder(w).Encode(x)
}}
"#,
        call
    )
}

pub fn xml_marshaler(call: &str) -> String {
    format!(
        r#"func (x {0}RequestType) MarshalXML() ([]byte, error) {{
	if RequestValidation {{
		if err := x.Validate(); err != nil {{
			return nil, err
		}}
	}}
	return xml.Marshal(x)
}}
"#,
        call
    )
}

/// The `Validate` method wrapping the derived check sequence for one call.
pub fn validator(call: &str, body: &str) -> String {
    format!(
        "func (x {0}RequestType) Validate() error {{\r\n{1}\treturn nil\r\n}}\r\n",
        call, body
    )
}
