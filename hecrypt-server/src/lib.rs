//! hecrypt-server: HTTP surface for multi-scheme homomorphic encryption
//!
//! | Route                       | Body                                   |
//! |-----------------------------|----------------------------------------|
//! | `GET /health`               |                                        |
//! | `GET /methods`              |                                        |
//! | `POST /encrypt`             | multipart `file`, `method`             |
//! | `POST /decrypt`             | JSON `{method, encrypted_output}`      |
//! | `POST /decrypt-artifact`    | raw artifact, `?method=`               |
//! | `POST /upload-and-encrypt`  | multipart `file`, `method`, `dropbox_token` |

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
