//! Lumen / Eloquent target: PHP models, controllers and `$router` routes.

use super::{TableContext, TargetTemplate, ROUTES};
use crate::config::{SoftDeleteConfig, TargetConfig};
use std::fmt::Write;

/// Renders Eloquent models and JSON controllers for a Lumen application
#[derive(Debug, Clone)]
pub struct LumenTemplate {
    model_namespace: String,
    controller_namespace: String,
    middleware: Option<String>,
    soft_delete: SoftDeleteConfig,
}

impl Default for LumenTemplate {
    fn default() -> Self {
        Self::new(&TargetConfig::default())
    }
}

impl LumenTemplate {
    pub fn new(config: &TargetConfig) -> Self {
        Self {
            model_namespace: config.model_namespace.clone(),
            controller_namespace: config.controller_namespace.clone(),
            middleware: config.middleware.clone(),
            soft_delete: config.soft_delete.clone(),
        }
    }
}

/// `['a', 'b']`
fn php_string_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Write the uniform `{success, message, data}` JSON envelope
fn write_json_response(code: &mut String, message: &str, data: &str, status: &str) {
    writeln!(code, "        return response()->json([").unwrap();
    writeln!(code, "            'success' => true,").unwrap();
    writeln!(code, "            'message' => '{}',", message).unwrap();
    writeln!(code, "            'data' => {}", data).unwrap();
    writeln!(code, "        ], {});", status).unwrap();
}

impl TargetTemplate for LumenTemplate {
    fn name(&self) -> &str {
        "lumen"
    }

    fn file_extension(&self) -> &str {
        "php"
    }

    fn render_model(&self, ctx: &TableContext) -> String {
        let model = self.model_name(ctx.table);
        let classification = ctx.classification;
        let mut code = String::new();

        writeln!(code, "<?php").unwrap();
        writeln!(code).unwrap();
        writeln!(code, "namespace {};", self.model_namespace).unwrap();
        writeln!(code).unwrap();
        writeln!(code, "use Illuminate\\Auth\\Authenticatable;").unwrap();
        writeln!(code, "use Illuminate\\Contracts\\Auth\\Access\\Authorizable as AuthorizableContract;").unwrap();
        writeln!(code, "use Illuminate\\Contracts\\Auth\\Authenticatable as AuthenticatableContract;").unwrap();
        writeln!(code, "use Illuminate\\Database\\Eloquent\\Factories\\HasFactory;").unwrap();
        writeln!(code, "use Illuminate\\Database\\Eloquent\\Model;").unwrap();
        writeln!(code, "use Laravel\\Lumen\\Auth\\Authorizable;").unwrap();
        writeln!(code).unwrap();
        writeln!(
            code,
            "class {} extends Model implements AuthenticatableContract, AuthorizableContract",
            model
        )
        .unwrap();
        writeln!(code, "{{").unwrap();
        writeln!(code, "    use Authenticatable, Authorizable, HasFactory;").unwrap();
        writeln!(code).unwrap();
        writeln!(code, "    protected $table = '{}';", ctx.table).unwrap();
        if let Some(primary_key) = &classification.primary_key {
            writeln!(code, "    protected $primaryKey = '{}';", primary_key).unwrap();
        }
        writeln!(
            code,
            "    protected $fillable = {};",
            php_string_list(&classification.fillable_columns)
        )
        .unwrap();
        writeln!(code, "    public $timestamps = {};", classification.has_timestamps).unwrap();
        writeln!(code, "    protected $connection = '{}';", ctx.connection).unwrap();
        writeln!(code, "}}").unwrap();

        code
    }

    fn render_controller(&self, ctx: &TableContext) -> String {
        let model = self.model_name(ctx.table);
        let controller = self.controller_name(ctx.table);
        let mut code = String::new();

        writeln!(code, "<?php").unwrap();
        writeln!(code).unwrap();
        writeln!(code, "namespace {};", self.controller_namespace).unwrap();
        writeln!(code).unwrap();
        writeln!(code, "use {}\\{};", self.model_namespace, model).unwrap();
        writeln!(code, "use Illuminate\\Http\\Request;").unwrap();
        writeln!(code).unwrap();
        writeln!(code, "class {} extends Controller", controller).unwrap();
        writeln!(code, "{{").unwrap();

        if let Some(middleware) = &self.middleware {
            writeln!(code, "    public function __construct()").unwrap();
            writeln!(code, "    {{").unwrap();
            writeln!(code, "        $this->middleware('{}');", middleware).unwrap();
            writeln!(code, "    }}").unwrap();
            writeln!(code).unwrap();
        }

        // index
        writeln!(code, "    public function index()").unwrap();
        writeln!(code, "    {{").unwrap();
        writeln!(code, "        $obj = {}::all();", model).unwrap();
        write_json_response(&mut code, "Show Success!", "$obj", "$obj ? 200 : 404");
        writeln!(code, "    }}").unwrap();
        writeln!(code).unwrap();

        // show
        writeln!(code, "    public function show($id)").unwrap();
        writeln!(code, "    {{").unwrap();
        writeln!(code, "        $obj = {}::find($id);", model).unwrap();
        write_json_response(&mut code, "Show Success!", "$obj", "$obj ? 200 : 404");
        writeln!(code, "    }}").unwrap();
        writeln!(code).unwrap();

        // register
        writeln!(code, "    public function register(Request $request)").unwrap();
        writeln!(code, "    {{").unwrap();
        writeln!(code, "        $obj = {}::create($request->all());", model).unwrap();
        write_json_response(&mut code, "Record created successfully!", "$obj", "$obj ? 201 : 400");
        writeln!(code, "    }}").unwrap();
        writeln!(code).unwrap();

        // update
        writeln!(code, "    public function update(Request $request, $id)").unwrap();
        writeln!(code, "    {{").unwrap();
        writeln!(code, "        $record = {}::findOrFail($id);", model).unwrap();
        writeln!(code, "        $record->update($request->all());").unwrap();
        write_json_response(&mut code, "Record updated successfully!", "$record", "200");
        writeln!(code, "    }}").unwrap();
        writeln!(code).unwrap();

        // delete: soft delete keyed on the primary key, which is '' when
        // the table has none
        writeln!(code, "    public function delete($id)").unwrap();
        writeln!(code, "    {{").unwrap();
        writeln!(
            code,
            "        $obj = {}::where('{}', $id)",
            model,
            ctx.classification.primary_key_name()
        )
        .unwrap();
        writeln!(
            code,
            "            ->update(['{}' => '{}']);",
            self.soft_delete.column, self.soft_delete.value
        )
        .unwrap();
        writeln!(code).unwrap();
        write_json_response(&mut code, "Record deleted successfully!", "null", "$obj ? 200 : 404");
        writeln!(code, "    }}").unwrap();
        writeln!(code, "}}").unwrap();

        code
    }

    fn render_routes(&self, ctx: &TableContext) -> String {
        let controller = self.controller_name(ctx.table);
        let mut code = String::new();

        writeln!(code, "// Route for {} model", self.model_name(ctx.table)).unwrap();
        for route in &ROUTES {
            writeln!(
                code,
                "$router->{}('{}', '{}@{}');",
                route.method.as_str(),
                route.path(ctx.table),
                controller,
                route.action
            )
            .unwrap();
        }

        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;

    fn orders_classification() -> Classification {
        Classification {
            primary_key: Some("id".to_string()),
            has_timestamps: true,
            fillable_columns: vec!["id".to_string(), "total".to_string()],
        }
    }

    fn logs_classification() -> Classification {
        Classification {
            primary_key: None,
            has_timestamps: false,
            fillable_columns: vec!["id".to_string(), "message".to_string()],
        }
    }

    #[test]
    fn test_render_model_orders() {
        let classification = orders_classification();
        let ctx = TableContext { table: "orders", connection: "main", classification: &classification };

        let expected = "\
<?php

namespace App\\Models;

use Illuminate\\Auth\\Authenticatable;
use Illuminate\\Contracts\\Auth\\Access\\Authorizable as AuthorizableContract;
use Illuminate\\Contracts\\Auth\\Authenticatable as AuthenticatableContract;
use Illuminate\\Database\\Eloquent\\Factories\\HasFactory;
use Illuminate\\Database\\Eloquent\\Model;
use Laravel\\Lumen\\Auth\\Authorizable;

class orders extends Model implements AuthenticatableContract, AuthorizableContract
{
    use Authenticatable, Authorizable, HasFactory;

    protected $table = 'orders';
    protected $primaryKey = 'id';
    protected $fillable = ['id', 'total'];
    public $timestamps = true;
    protected $connection = 'main';
}
";
        assert_eq!(LumenTemplate::default().render_model(&ctx), expected);
    }

    #[test]
    fn test_render_model_without_primary_key() {
        let classification = logs_classification();
        let ctx = TableContext { table: "logs", connection: "main", classification: &classification };

        let model = LumenTemplate::default().render_model(&ctx);
        assert!(!model.contains("$primaryKey"));
        assert!(model.contains("    protected $table = 'logs';\n    protected $fillable = ['id', 'message'];\n"));
        assert!(model.contains("public $timestamps = false;"));
    }

    #[test]
    fn test_render_model_empty_fillable() {
        let classification = Classification { has_timestamps: true, ..Classification::default() };
        let ctx = TableContext { table: "audit", connection: "main", classification: &classification };

        assert!(LumenTemplate::default().render_model(&ctx).contains("protected $fillable = [];"));
    }

    #[test]
    fn test_render_controller_orders() {
        let classification = orders_classification();
        let ctx = TableContext { table: "orders", connection: "main", classification: &classification };

        let controller = LumenTemplate::default().render_controller(&ctx);
        assert!(controller.starts_with("<?php\n\nnamespace App\\Http\\Controllers;\n\nuse App\\Models\\orders;\n"));
        assert!(controller.contains("class ordersController extends Controller\n{"));
        assert!(controller.contains("$this->middleware('auth');"));
        for handler in ["index()", "show($id)", "register(Request $request)", "update(Request $request, $id)", "delete($id)"] {
            assert!(controller.contains(&format!("public function {}", handler)), "missing {}", handler);
        }
        assert!(controller.contains("$obj = orders::where('id', $id)\n            ->update(['recordstatus' => 'DEL']);"));
        assert!(controller.contains("], $obj ? 201 : 400);"));
        assert_eq!(controller.matches("'success' => true,").count(), 5);
        assert!(controller.ends_with("}\n"));
    }

    #[test]
    fn test_delete_handler_uses_empty_key_without_primary_key() {
        // Fragile but intended: tables without a primary key get a delete
        // handler filtering on ''.
        let classification = logs_classification();
        let ctx = TableContext { table: "logs", connection: "main", classification: &classification };

        let controller = LumenTemplate::default().render_controller(&ctx);
        assert!(controller.contains("$obj = logs::where('', $id)"));
    }

    #[test]
    fn test_render_controller_with_custom_target_config() {
        let config = TargetConfig {
            model_namespace: "Shop\\Models".to_string(),
            controller_namespace: "Shop\\Http".to_string(),
            middleware: None,
            soft_delete: SoftDeleteConfig { column: "status".to_string(), value: "X".to_string() },
        };
        let classification = orders_classification();
        let ctx = TableContext { table: "orders", connection: "main", classification: &classification };

        let controller = LumenTemplate::new(&config).render_controller(&ctx);
        assert!(controller.contains("namespace Shop\\Http;"));
        assert!(controller.contains("use Shop\\Models\\orders;"));
        assert!(!controller.contains("__construct"));
        assert!(controller.contains("->update(['status' => 'X']);"));
    }

    #[test]
    fn test_render_routes() {
        let classification = orders_classification();
        let ctx = TableContext { table: "orders", connection: "main", classification: &classification };

        let expected = "\
// Route for orders model
$router->get('/orders/list', 'ordersController@index');
$router->get('/orders/show/{id}', 'ordersController@show');
$router->post('/orders/register', 'ordersController@register');
$router->post('/orders/update/{id}', 'ordersController@update');
$router->get('/orders/delete/{id}', 'ordersController@delete');
";
        assert_eq!(LumenTemplate::default().render_routes(&ctx), expected);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let classification = orders_classification();
        let ctx = TableContext { table: "orders", connection: "main", classification: &classification };
        let template = LumenTemplate::default();

        assert_eq!(template.render_model(&ctx), template.render_model(&ctx));
        assert_eq!(template.render_controller(&ctx), template.render_controller(&ctx));
    }

    #[test]
    fn test_file_names() {
        let template = LumenTemplate::default();
        assert_eq!(template.model_file_name("orders"), "orders.php");
        assert_eq!(template.controller_file_name("orders"), "ordersController.php");
    }
}
