//! Image reference rewriting through the public API.

use zaira_babel::{
    convert_attachments_to_images, convert_images_to_attachments, extract_local_images,
    LocalImage,
};

#[test]
fn test_local_image_rewrite_is_selective() {
    assert_eq!(
        convert_images_to_attachments("![x](./img/a.png)"),
        "![x](attachment:a.png)"
    );
    assert_eq!(
        convert_images_to_attachments("![x](https://example.com/a.png)"),
        "![x](https://example.com/a.png)"
    );
}

#[test]
fn test_rewrites_every_image_in_a_document() {
    let md = "# Doc\n\n![a](one.png) and ![b](../shared/two.jpg)\n\n![c](//cdn.example.com/three.gif)\n";
    assert_eq!(
        convert_images_to_attachments(md),
        "# Doc\n\n![a](attachment:one.png) and ![b](attachment:two.jpg)\n\n![c](//cdn.example.com/three.gif)\n"
    );
}

#[test]
fn test_attachment_and_local_rewrites_are_inverse_for_one_directory() {
    let md = "![a](./images/one.png)\n![b](./images/two.png)";
    let attached = convert_images_to_attachments(md);
    assert_eq!(convert_attachments_to_images(&attached, "./images"), md);
}

#[test]
fn test_extract_local_images_feeds_uploads() {
    let md = "![Diagram](docs/diagram.png)\n![Remote](http://x.org/r.png)";
    assert_eq!(
        extract_local_images(md),
        vec![LocalImage {
            alt: "Diagram".to_string(),
            path: "docs/diagram.png".to_string(),
        }]
    );
    assert!(extract_local_images("no images here").is_empty());
}
